pub mod popup;
pub mod sidebar;
