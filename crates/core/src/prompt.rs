//! Prompt construction for the image generator

use crate::models::Selection;

/// Fallback phrase used when no furniture is selected.
pub const NO_FURNITURE: &str = "no specific furniture";

/// Build the image-generation prompt for a selection.
///
/// Empty theme/room interpolate as empty strings; an empty furniture set
/// uses the fallback phrase. Neither case is an error.
pub fn design_prompt(selection: &Selection) -> String {
    let furniture = if selection.furniture.is_empty() {
        NO_FURNITURE.to_string()
    } else {
        selection.furniture.join(", ")
    };

    format!(
        "Generate an interior design image for a {} in a {} style with {}.",
        selection.room_str(),
        selection.theme_str(),
        furniture
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_selection_prompt() {
        let mut selection = Selection::new();
        selection.theme = Some("Modern".to_string());
        selection.room = Some("Living Room".to_string());
        selection.push_furniture("Sofa");
        selection.push_furniture("Lamp");

        assert_eq!(
            design_prompt(&selection),
            "Generate an interior design image for a Living Room in a Modern style with Sofa, Lamp."
        );
    }

    #[test]
    fn test_empty_selection_uses_fallback() {
        let selection = Selection::new();

        assert_eq!(
            design_prompt(&selection),
            "Generate an interior design image for a  in a  style with no specific furniture."
        );
    }
}
