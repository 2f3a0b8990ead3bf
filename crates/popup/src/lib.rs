pub mod opener;

pub use opener::{CommandPopupOpener, Launch, PopupError, PopupGeometry, PopupOpener};
