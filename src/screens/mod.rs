//! Concrete layers
//!
//! Canvas is 800×600, y down. Every non-root screen has the back button in
//! the top-left corner; the game HUD lives in the top-right.

pub mod back_button;
pub mod game;
pub mod level_editor;
pub mod level_select;
pub mod main_menu;
pub mod title;

pub use back_button::BackButtonLayer;
pub use game::GameLayer;
pub use level_editor::{LevelEditorLayer, OpenDialogLayer};
pub use level_select::LevelSelectLayer;
pub use main_menu::{InstructionsLayer, MainMenuLayer};
pub use title::TitleLayer;

use crate::view::{Layer, LayerKind};

/// Default layer factory
pub fn build_layer(kind: LayerKind) -> Box<dyn Layer> {
    match kind {
        LayerKind::Title => Box::new(TitleLayer),
        LayerKind::MainMenu => Box::new(MainMenuLayer::new()),
        LayerKind::Instructions => Box::new(InstructionsLayer),
        LayerKind::LevelSelect => Box::new(LevelSelectLayer),
        LayerKind::LevelEditor => Box::new(LevelEditorLayer::new()),
        LayerKind::OpenDialog => Box::new(OpenDialogLayer),
        LayerKind::Game => Box::new(GameLayer::new()),
        LayerKind::BackButton => Box::new(BackButtonLayer::new()),
    }
}

/// Background fill for menus
pub(crate) const MENU_BG: &str = "#87CEEB";
pub(crate) const BUTTON: &str = "#3A6EA5";
pub(crate) const TEXT: &str = "#FFFFFF";
