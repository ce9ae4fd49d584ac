//! User-facing notification capability injected into the screens.

/// Presents alerts and confirmation prompts to the user.
///
/// The screens only ever speak through this trait, so any UI (terminal,
/// native dialog, test recorder) can stand behind it.
pub trait Notifier {
    fn alert(&self, title: &str, message: &str);

    /// Ask the user to confirm a destructive action. `true` means proceed.
    fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Texts shown to the user.
pub mod messages {
    pub const ERROR_TITLE: &str = "Erreur";
    pub const LOAD_FAILED: &str = "Impossible de charger les appartements";
    pub const MISSING_FIELDS: &str = "Veuillez remplir tous les champs";
    pub const INVALID_RENT: &str = "Le loyer doit être un nombre valide";
    pub const SAVE_FAILED: &str = "Impossible de sauvegarder l'appartement";
    pub const DELETE_FAILED: &str = "Impossible de supprimer l'appartement";
    pub const UNKNOWN_APARTMENT: &str = "Appartement introuvable";
    pub const CONFIRM_DELETE_TITLE: &str = "Confirmer la suppression";

    pub fn confirm_delete(design: &str) -> String {
        format!("Êtes-vous sûr de vouloir supprimer {design} ?")
    }
}
