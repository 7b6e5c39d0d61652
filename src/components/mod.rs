pub mod about_view;
pub mod app;
pub mod chat_panel;
pub mod guide_view;
pub mod map_view;
pub mod message;

pub use about_view::AboutView;
pub use app::App;
pub use chat_panel::ChatPanel;
pub use guide_view::GuideView;
pub use map_view::MapView;
pub use message::MessageRow;
