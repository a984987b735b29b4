use crate::types::addon::{AddonEntry, ManifestEdit};

/// What the user changed in the edit form: manifest fields plus renamed catalogs, each
/// catalog addressed by its position when the form was opened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditForm {
    pub fields: ManifestEdit,
    pub catalog_names: Vec<(usize, String)>,
}

impl EditForm {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.catalog_names.is_empty()
    }
}

pub fn prompt_edit_form(entry: &AddonEntry) -> Result<EditForm, inquire::InquireError> {
    let current_name = entry.manifest_name().unwrap_or("");

    let name = inquire::Text::new("Name:")
        .with_default(current_name)
        .prompt()?;
    let description = inquire::Text::new("Description:")
        .with_default(entry.description().unwrap_or(""))
        .prompt()?;

    let mut form = EditForm {
        fields: ManifestEdit {
            name: changed_name(current_name, name),
            description: changed_field(entry.description(), description),
            ..Default::default()
        },
        catalog_names: Vec::new(),
    };

    let advanced = inquire::Confirm::new("Edit advanced fields (logo, background, catalogs)?")
        .with_default(false)
        .prompt()?;
    if !advanced {
        return Ok(form);
    }

    let logo = inquire::Text::new("Logo URL:")
        .with_default(entry.logo().unwrap_or(""))
        .prompt()?;
    let background = inquire::Text::new("Background URL:")
        .with_default(entry.background().unwrap_or(""))
        .prompt()?;
    form.fields.logo = changed_field(entry.logo(), logo);
    form.fields.background = changed_field(entry.background(), background);

    for (catalog_index, catalog) in entry.catalogs().iter().enumerate() {
        let current = catalog.name().unwrap_or("");
        let input = inquire::Text::new(&format!("Catalog: {}", catalog.display_name()))
            .with_default(current)
            .prompt()?;
        if let Some(name) = changed_field(catalog.name(), input) {
            form.catalog_names.push((catalog_index, name));
        }
    }

    Ok(form)
}

/// A blank name would leave nothing to display, so it counts as "no change".
pub fn changed_name(current: &str, input: String) -> Option<String> {
    if input.trim().is_empty() || input == current {
        None
    } else {
        Some(input)
    }
}

/// Returns the new value only when it differs from the current one. An absent field left
/// blank stays absent instead of becoming an empty string.
pub fn changed_field(current: Option<&str>, input: String) -> Option<String> {
    match current {
        Some(value) if value == input => None,
        None if input.is_empty() => None,
        _ => Some(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_or_same_name_is_no_change() {
        assert_eq!(changed_name("Torrentio", "   ".to_string()), None);
        assert_eq!(changed_name("Torrentio", "Torrentio".to_string()), None);
        assert_eq!(
            changed_name("Torrentio", "Torrents".to_string()),
            Some("Torrents".to_string())
        );
    }

    #[test]
    fn optional_fields_only_change_when_edited() {
        assert_eq!(changed_field(None, String::new()), None);
        assert_eq!(changed_field(Some("a"), "a".to_string()), None);
        assert_eq!(changed_field(Some("a"), String::new()), Some(String::new()));
        assert_eq!(changed_field(None, "b".to_string()), Some("b".to_string()));
    }

    #[test]
    fn empty_form() {
        assert!(EditForm::default().is_empty());
        let form = EditForm {
            catalog_names: vec![(0, "Top".to_string())],
            ..Default::default()
        };
        assert!(!form.is_empty());
    }
}
