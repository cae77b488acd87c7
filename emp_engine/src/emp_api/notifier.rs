use crate::emp_api::{NewEventNotice, NotificationError};

/// Tells vendors that they have been invited to bid on a new event.
///
/// Delivery (email, push, sockets) is up to the implementation. The fan-out calls this at most once per run, and only
/// when at least one bid was written.
#[allow(async_fn_in_trait)]
pub trait VendorNotifier {
    async fn notify_vendors_for_new_event(&self, notice: NewEventNotice) -> Result<(), NotificationError>;
}
