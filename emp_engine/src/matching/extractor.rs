//! Walks the service sections of an event creation request and collects every category need.
use emp_common::ObjectId;
use log::*;
use serde_json::Value;

use crate::matching::{
    dedupe_needs,
    BidGroup,
    CategoryNeed,
    EventCreationRequest,
    PlannedNeed,
    ServiceNode,
    ServiceSection,
};

pub const CATERING_KEY: &str = "catering";
pub const STALLS_KEY: &str = "stalls";
pub const STALL_KINDS: [&str; 4] = ["food", "accessories", "artsAndCrafts", "vape"];

/// Collects the needs below `root`, depth first, in document order.
///
/// The root itself never produces a need, even if it carries category ids. Self-serviced subtrees (`vendor: true`)
/// are skipped entirely. A need node whose ids cannot be coerced is dropped, but its children are still visited.
pub fn extract_needs(root: &ServiceNode) -> Vec<CategoryNeed> {
    let mut needs = Vec::new();
    walk_root(root, &|_| false, &mut needs);
    needs
}

/// The generic walk of the `vendorsStalls` section. Catering and the four stall kinds are left out, since they are
/// fanned out separately by [`catering_need`] and [`stall_needs`].
pub fn extract_vendors_stalls_needs(root: &ServiceNode) -> Vec<CategoryNeed> {
    let mut needs = Vec::new();
    let (ServiceNode::Need { children, .. } | ServiceNode::Container(children)) = root else {
        walk_root(root, &|_| false, &mut needs);
        return needs;
    };
    for (key, child) in children {
        match key.as_str() {
            CATERING_KEY => {},
            STALLS_KEY => match child {
                ServiceNode::Need { children, .. } | ServiceNode::Container(children) => {
                    emit(child, &mut needs);
                    walk_children(children, &|k| STALL_KINDS.contains(&k), &mut needs);
                },
                other => visit(other, &mut needs),
            },
            _ => visit(child, &mut needs),
        }
    }
    needs
}

/// The catering need from a `vendorsStalls` section, if one was requested and is not self-serviced.
pub fn catering_need(vendors_stalls: &ServiceNode) -> Option<CategoryNeed> {
    let node = vendors_stalls.child(CATERING_KEY)?;
    let ServiceNode::Need { main, sub, .. } = node else {
        return None;
    };
    let main = coerce(main, "catering main category")?;
    let sub = coerce(sub, "catering sub category")?;
    Some(CategoryNeed::new(main, Some(sub), None))
}

/// The stall needs (food, accessories, arts & crafts, vape) from a `vendorsStalls` section.
///
/// A leaf id that fails coercion is discarded; the stall is still requested on its sub category.
pub fn stall_needs(vendors_stalls: &ServiceNode) -> Vec<CategoryNeed> {
    let Some(stalls) = vendors_stalls.child(STALLS_KEY) else {
        return vec![];
    };
    STALL_KINDS
        .iter()
        .filter_map(|kind| stalls.child(kind))
        .filter_map(|node| {
            let ServiceNode::Need { main, sub, leaf, .. } = node else {
                return None;
            };
            let main = coerce(main, "stall main category")?;
            let sub = coerce(sub, "stall sub category")?;
            let leaf = leaf.as_ref().and_then(|l| coerce(l, "stall leaf category"));
            Some(CategoryNeed::new(main, Some(sub), leaf))
        })
        .collect()
}

/// The venue need, when the coordinator does not have a venue and named the venue service they are after.
pub fn venue_need(request: &EventCreationRequest) -> Option<CategoryNeed> {
    if !request.wants_venue() {
        return None;
    }
    let id = request.venue_service_id.as_deref().filter(|s| !s.is_empty())?;
    match id.parse::<ObjectId>() {
        Ok(main) => Some(CategoryNeed::venue(main)),
        Err(e) => {
            warn!("🔄️ Ignoring venue service id {id:?}: {e}");
            None
        },
    }
}

/// Extracts, groups and de-duplicates every need in the request, in fan-out order: generic service needs (all
/// sections, in [`ServiceSection::ALL`] order), then catering, then stalls, then the venue.
///
/// Catering is planned with the generic service needs, and de-duplication happens within that group and within the
/// stall needs. The venue produces at most one need.
pub fn plan_needs(request: &EventCreationRequest) -> Vec<PlannedNeed> {
    let mut service_needs = Vec::new();
    for section in ServiceSection::ALL {
        let Some(payload) = request.section(section) else {
            continue;
        };
        let needs = match section {
            ServiceSection::VendorsStalls => extract_vendors_stalls_needs(payload.tree()),
            _ => extract_needs(payload.tree()),
        };
        trace!("🔄️ {} needs extracted from {section}", needs.len());
        service_needs.extend(needs);
    }
    let vendors_stalls = request.vendors_stalls.as_ref().map(|p| p.tree()).filter(|vs| !vs.is_self_serviced());
    if let Some(need) = vendors_stalls.and_then(catering_need) {
        service_needs.push(need);
    }
    let mut plan: Vec<PlannedNeed> =
        dedupe_needs(service_needs).into_iter().map(|n| PlannedNeed::new(n, BidGroup::SERVICE)).collect();
    if let Some(vendors_stalls) = vendors_stalls {
        let stalls = dedupe_needs(stall_needs(vendors_stalls));
        plan.extend(stalls.into_iter().map(|n| PlannedNeed::new(n, BidGroup::STALL)));
    }
    if let Some(need) = venue_need(request) {
        plan.push(PlannedNeed::new(need, BidGroup::VENUE));
    }
    debug!("🔄️ {} needs planned for '{}'", plan.len(), request.title);
    plan
}

fn walk_root(root: &ServiceNode, skip: &dyn Fn(&str) -> bool, out: &mut Vec<CategoryNeed>) {
    match root {
        ServiceNode::SelfServiced | ServiceNode::Value => {},
        ServiceNode::Need { children, .. } | ServiceNode::Container(children) => walk_children(children, skip, out),
        ServiceNode::List(items) => items.iter().for_each(|item| visit(item, out)),
    }
}

fn walk_children(children: &[(String, ServiceNode)], skip: &dyn Fn(&str) -> bool, out: &mut Vec<CategoryNeed>) {
    for (key, child) in children {
        if !skip(key) {
            visit(child, out);
        }
    }
}

fn visit(node: &ServiceNode, out: &mut Vec<CategoryNeed>) {
    match node {
        ServiceNode::SelfServiced | ServiceNode::Value => {},
        ServiceNode::Need { children, .. } => {
            emit(node, out);
            walk_children(children, &|_| false, out);
        },
        ServiceNode::Container(children) => walk_children(children, &|_| false, out),
        ServiceNode::List(items) => items.iter().for_each(|item| visit(item, out)),
    }
}

fn emit(node: &ServiceNode, out: &mut Vec<CategoryNeed>) {
    let ServiceNode::Need { main, sub, leaf, .. } = node else {
        return;
    };
    let need = (|| {
        let main = coerce(main, "main category")?;
        let sub = coerce(sub, "sub category")?;
        let leaf = match leaf {
            Some(l) => Some(coerce(l, "leaf category")?),
            None => None,
        };
        Some(CategoryNeed::new(main, Some(sub), leaf))
    })();
    if let Some(need) = need {
        out.push(need);
    }
}

fn coerce(value: &Value, what: &str) -> Option<ObjectId> {
    ObjectId::try_from(value)
        .map_err(|e| warn!("🔄️ Dropping need with unusable {what} id {value}: {e}"))
        .ok()
}
