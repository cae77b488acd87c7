use std::fmt::Display;

use emp_common::Zar;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::matching::ServiceNode;

/// The fixed set of service sections an event creation request can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceSection {
    Permissions,
    Infrastructure,
    Decoration,
    Sanitation,
    Safety,
    Camping,
    BeveragesBarServices,
    BrandingPromotion,
    AccreditationEntry,
    StaffingSupport,
    Transport,
    VendorsStalls,
}

impl ServiceSection {
    /// All sections, in the order they are scanned for needs.
    pub const ALL: [ServiceSection; 12] = [
        ServiceSection::Permissions,
        ServiceSection::Infrastructure,
        ServiceSection::Decoration,
        ServiceSection::Sanitation,
        ServiceSection::Safety,
        ServiceSection::Camping,
        ServiceSection::BeveragesBarServices,
        ServiceSection::BrandingPromotion,
        ServiceSection::AccreditationEntry,
        ServiceSection::StaffingSupport,
        ServiceSection::Transport,
        ServiceSection::VendorsStalls,
    ];

    pub fn json_key(&self) -> &'static str {
        match self {
            ServiceSection::Permissions => "permissions",
            ServiceSection::Infrastructure => "infrastructure",
            ServiceSection::Decoration => "decoration",
            ServiceSection::Sanitation => "sanitation",
            ServiceSection::Safety => "safety",
            ServiceSection::Camping => "camping",
            ServiceSection::BeveragesBarServices => "beveragesBarServices",
            ServiceSection::BrandingPromotion => "brandingPromotion",
            ServiceSection::AccreditationEntry => "accreditationEntry",
            ServiceSection::StaffingSupport => "staffingSupport",
            ServiceSection::Transport => "transport",
            ServiceSection::VendorsStalls => "vendorsStalls",
        }
    }
}

impl Display for ServiceSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.json_key())
    }
}

//--------------------------------------    SectionPayload     ---------------------------------------------------------
/// One service section as submitted. The raw document is kept for storage; the parsed tree drives extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionPayload {
    raw: Value,
    tree: ServiceNode,
}

impl SectionPayload {
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn tree(&self) -> &ServiceNode {
        &self.tree
    }
}

impl From<Value> for SectionPayload {
    fn from(raw: Value) -> Self {
        let tree = ServiceNode::from(&raw);
        Self { raw, tree }
    }
}

impl Serialize for SectionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SectionPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SectionPayload::from)
    }
}

//--------------------------------------  EventCreationRequest ---------------------------------------------------------
/// The payload a coordinator submits to create an event.
///
/// Only `title` and `userId` are required. Sections that are absent, or `null`, contribute no needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreationRequest {
    pub title: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_event_venue: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_image_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_tickets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_people: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_price: Option<Zar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_fee: Option<Zar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    /// Stored with the event. Seating is never matched against vendors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seating_arrangement: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitation: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camping: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beverages_bar_services: Option<SectionPayload>,
    #[serde(default, alias = "brandingPromotionDto", skip_serializing_if = "Option::is_none")]
    pub branding_promotion: Option<SectionPayload>,
    #[serde(default, alias = "accreditationEntryDto", skip_serializing_if = "Option::is_none")]
    pub accreditation_entry: Option<SectionPayload>,
    #[serde(default, alias = "staffingSupportDto", skip_serializing_if = "Option::is_none")]
    pub staffing_support: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendors_stalls: Option<SectionPayload>,
}

impl EventCreationRequest {
    pub fn new<S: Into<String>>(title: S, user_id: S) -> Self {
        Self { title: title.into(), user_id: user_id.into(), ..Default::default() }
    }

    pub fn section(&self, section: ServiceSection) -> Option<&SectionPayload> {
        let payload = match section {
            ServiceSection::Permissions => &self.permissions,
            ServiceSection::Infrastructure => &self.infrastructure,
            ServiceSection::Decoration => &self.decoration,
            ServiceSection::Sanitation => &self.sanitation,
            ServiceSection::Safety => &self.safety,
            ServiceSection::Camping => &self.camping,
            ServiceSection::BeveragesBarServices => &self.beverages_bar_services,
            ServiceSection::BrandingPromotion => &self.branding_promotion,
            ServiceSection::AccreditationEntry => &self.accreditation_entry,
            ServiceSection::StaffingSupport => &self.staffing_support,
            ServiceSection::Transport => &self.transport,
            ServiceSection::VendorsStalls => &self.vendors_stalls,
        };
        payload.as_ref()
    }

    /// Replace (or clear) a section. Mostly useful for building requests in code.
    pub fn with_section(mut self, section: ServiceSection, raw: Value) -> Self {
        let payload = Some(SectionPayload::from(raw));
        match section {
            ServiceSection::Permissions => self.permissions = payload,
            ServiceSection::Infrastructure => self.infrastructure = payload,
            ServiceSection::Decoration => self.decoration = payload,
            ServiceSection::Sanitation => self.sanitation = payload,
            ServiceSection::Safety => self.safety = payload,
            ServiceSection::Camping => self.camping = payload,
            ServiceSection::BeveragesBarServices => self.beverages_bar_services = payload,
            ServiceSection::BrandingPromotion => self.branding_promotion = payload,
            ServiceSection::AccreditationEntry => self.accreditation_entry = payload,
            ServiceSection::StaffingSupport => self.staffing_support = payload,
            ServiceSection::Transport => self.transport = payload,
            ServiceSection::VendorsStalls => self.vendors_stalls = payload,
        }
        self
    }

    pub fn with_venue<S: Into<String>>(mut self, is_event_venue: bool, venue_service_id: Option<S>) -> Self {
        self.is_event_venue = Some(is_event_venue);
        self.venue_service_id = venue_service_id.map(Into::into);
        self
    }

    pub fn wants_venue(&self) -> bool {
        !self.is_event_venue.unwrap_or(false)
    }
}
