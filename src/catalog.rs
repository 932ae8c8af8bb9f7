//! Option sources for the laser-settings search form.
//!
//! Records are decoded from the settings API's JSON payloads (`/api/brands`,
//! `/api/brands/{id}/models`, `/api/materials`, `/api/operations`) and turned into
//! combobox options whose values are the decimal record IDs.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::widgets::combobox::{Combobox, ComboboxTheme, OptionList, SelectOption};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineModel {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "LaserType")]
    pub laser_type: String,
    #[serde(rename = "Wattage")]
    pub wattage: i32,
    #[serde(rename = "BrandID", default)]
    pub brand_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
}

/// A record that can be offered as a combobox option.
pub trait OptionSource {
    fn id(&self) -> i32;
    fn option_label(&self) -> String;

    fn to_option(&self) -> SelectOption {
        SelectOption::new(self.id().to_string(), self.option_label())
    }
}

impl OptionSource for Brand {
    fn id(&self) -> i32 {
        self.id
    }

    fn option_label(&self) -> String {
        self.name.clone()
    }
}

impl OptionSource for MachineModel {
    fn id(&self) -> i32 {
        self.id
    }

    fn option_label(&self) -> String {
        format!("{} ({} {}W)", self.name, self.laser_type, self.wattage)
    }
}

impl OptionSource for Material {
    fn id(&self) -> i32 {
        self.id
    }

    fn option_label(&self) -> String {
        self.name.clone()
    }
}

impl OptionSource for Operation {
    fn id(&self) -> i32 {
        self.id
    }

    fn option_label(&self) -> String {
        self.name.clone()
    }
}

/// Decodes a JSON array of records. `null` decodes as an empty list.
pub fn parse_records<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let records: Option<Vec<T>> = serde_json::from_str(json)?;
    let records = records.unwrap_or_default();
    tracing::debug!(count = records.len(), "catalog records decoded");
    Ok(records)
}

pub fn find_by_id<T: OptionSource>(records: &[T], id: i32) -> Option<&T> {
    records.iter().find(|record| record.id() == id)
}

/// Options in record order.
pub fn options_from<T: OptionSource>(records: &[T]) -> OptionList {
    records.iter().map(|record| record.to_option()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Brand,
    MachineModel,
    Material,
    Operation,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Brand,
        FilterField::MachineModel,
        FilterField::Material,
        FilterField::Operation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Brand => "Machine Brand",
            FilterField::MachineModel => "Machine Model",
            FilterField::Material => "Material",
            FilterField::Operation => "Operation",
        }
    }
}

/// Current selections of the search form. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub brand_id: String,
    pub machine_model_id: String,
    pub material_id: String,
    pub operation_id: String,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Brand => &self.brand_id,
            FilterField::MachineModel => &self.machine_model_id,
            FilterField::Material => &self.material_id,
            FilterField::Operation => &self.operation_id,
        }
    }

    /// Records a committed value. Changing the brand clears the model, since models are
    /// listed per brand.
    pub fn apply(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Brand => {
                self.brand_id = value;
                self.machine_model_id.clear();
            }
            FilterField::MachineModel => self.machine_model_id = value,
            FilterField::Material => self.material_id = value,
            FilterField::Operation => self.operation_id = value,
        }
        tracing::debug!(field = ?field, filters = ?self, "search filters updated");
    }

    pub fn placeholder(&self, field: FilterField) -> &'static str {
        match field {
            FilterField::Brand => "Select brand...",
            FilterField::MachineModel if self.brand_id.is_empty() => "Select brand first",
            FilterField::MachineModel => "Select model...",
            FilterField::Material => "Any material",
            FilterField::Operation => "Any operation",
        }
    }

    /// Path the model list is fetched from, once a brand is chosen.
    pub fn models_path(&self) -> Option<String> {
        if self.brand_id.is_empty() {
            None
        } else {
            Some(format!("/api/brands/{}/models", self.brand_id))
        }
    }

    /// Query pairs for `/api/settings`. The brand only narrows the model list and is not sent.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        [
            ("machine_model_id", &self.machine_model_id),
            ("material_id", &self.material_id),
            ("operation_id", &self.operation_id),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.clone()))
        .collect()
    }

    pub fn has_filters(&self) -> bool {
        !self.to_query().is_empty()
    }

    /// A labelled combobox showing `field`'s current value.
    pub fn combobox(&self, field: FilterField, options: OptionList, theme: ComboboxTheme) -> Combobox {
        let mut combobox = Combobox::new(self.get(field), options, self.placeholder(field), theme);
        combobox.set_label(Some(field.label().to_string()));
        combobox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::widgets::combobox::ComboboxTheme;

    const MODELS: &str = r#"[
        {"ID": 4, "Name": "Aura", "LaserType": "Diode", "Wattage": 6, "BrandID": 1},
        {"ID": 9, "Name": "Pro", "LaserType": "CO2", "Wattage": 45, "BrandID": 1}
    ]"#;

    #[test]
    fn models_decode_and_label_with_type_and_wattage() {
        let models: Vec<MachineModel> = parse_records(MODELS).expect("models");
        assert_eq!(models[1].brand_id, Some(1));

        let options = options_from(&models);
        assert_eq!(options.len(), 2);
        assert_eq!(options.get(0), Some(&SelectOption::new("4", "Aura (Diode 6W)")));
        assert_eq!(options.label_for("9"), Some("Pro (CO2 45W)"));
        assert_eq!(find_by_id(&models, 9).map(|m| m.name.as_str()), Some("Pro"));
        assert!(find_by_id(&models, 5).is_none());
    }

    #[test]
    fn null_payload_is_empty_and_garbage_is_an_error() {
        let brands: Vec<Brand> = parse_records("null").expect("null");
        assert!(brands.is_empty());

        let err = parse_records::<Brand>("{\"ID\": 1}").expect_err("object is not a list");
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn brand_change_clears_model() {
        let mut filters = SearchFilters::new();
        assert_eq!(filters.placeholder(FilterField::MachineModel), "Select brand first");
        assert_eq!(filters.models_path(), None);

        filters.apply(FilterField::Brand, "1");
        filters.apply(FilterField::MachineModel, "9");
        assert_eq!(filters.placeholder(FilterField::MachineModel), "Select model...");
        assert_eq!(filters.models_path().as_deref(), Some("/api/brands/1/models"));

        filters.apply(FilterField::Brand, "2");
        assert_eq!(filters.machine_model_id, "");
        assert_eq!(filters.get(FilterField::Brand), "2");
    }

    #[test]
    fn query_skips_brand_and_empty_fields() {
        let mut filters = SearchFilters::new();
        filters.apply(FilterField::Brand, "1");
        assert!(!filters.has_filters());

        filters.apply(FilterField::MachineModel, "9");
        filters.apply(FilterField::Operation, "3");
        assert_eq!(
            filters.to_query(),
            vec![
                ("machine_model_id", "9".to_string()),
                ("operation_id", "3".to_string())
            ]
        );
    }

    #[test]
    fn combobox_uses_field_label_and_placeholder() {
        let filters = SearchFilters::new();
        let combobox = filters.combobox(
            FilterField::Material,
            OptionList::default(),
            ComboboxTheme::plain(),
        );
        let snapshot = combobox.accessibility();
        assert_eq!(snapshot.label.as_deref(), Some("Material"));
        assert_eq!(snapshot.value_text, "Any material");
    }
}
