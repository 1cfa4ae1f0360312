mod activity;
mod details;
mod status;

pub use activity::draw_activity;
pub use details::draw_details;
pub use status::draw_status;
