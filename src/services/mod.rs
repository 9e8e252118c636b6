// Screen services — business logic behind each console screen.
// Each screen's data is independently owned; navigating back always
// triggers a fresh fetch rather than reusing cached state.

pub mod analytics;
pub mod approvals;
pub mod leads;
pub mod pipeline;
