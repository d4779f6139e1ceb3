use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOption {
    pub option_id: String,
    pub choice_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFeature {
    pub id: String,
    pub selected_options: Vec<SelectedOption>,
}

impl SelectedFeature {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selected_options: Vec::new(),
        }
    }

    pub fn choice_for(&self, option_id: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|o| o.option_id == option_id)
            .map(|o| o.choice_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSubService {
    pub id: String,
    pub selected_features: Vec<SelectedFeature>,
}

impl SelectedSubService {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selected_features: Vec::new(),
        }
    }

    pub fn feature(&self, feature_id: &str) -> Option<&SelectedFeature> {
        self.selected_features.iter().find(|f| f.id == feature_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedService {
    pub id: String,
    pub selected_sub_services: Vec<SelectedSubService>,
}

impl SelectedService {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selected_sub_services: Vec::new(),
        }
    }

    pub fn sub_service(&self, sub_service_id: &str) -> Option<&SelectedSubService> {
        self.selected_sub_services
            .iter()
            .find(|s| s.id == sub_service_id)
    }

    pub fn feature_count(&self) -> usize {
        self.selected_sub_services
            .iter()
            .map(|s| s.selected_features.len())
            .sum()
    }
}

/// The user's current picks, referencing catalog entries by id only.
///
/// Services keep insertion order; that order is also the display order of
/// every summary. Mutations go through [`crate::core::mutation`], which
/// always returns a fresh model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionModel {
    pub selected_services: Vec<SelectedService>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_services.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected_services.len()
    }

    pub fn service(&self, service_id: &str) -> Option<&SelectedService> {
        self.selected_services.iter().find(|s| s.id == service_id)
    }

    pub fn sub_service(
        &self,
        service_id: &str,
        sub_service_id: &str,
    ) -> Option<&SelectedSubService> {
        self.service(service_id)?.sub_service(sub_service_id)
    }

    pub fn feature(
        &self,
        service_id: &str,
        sub_service_id: &str,
        feature_id: &str,
    ) -> Option<&SelectedFeature> {
        self.sub_service(service_id, sub_service_id)?
            .feature(feature_id)
    }

    pub fn option_choice(
        &self,
        service_id: &str,
        sub_service_id: &str,
        feature_id: &str,
        option_id: &str,
    ) -> Option<&str> {
        self.feature(service_id, sub_service_id, feature_id)?
            .choice_for(option_id)
    }

    pub fn is_service_selected(&self, service_id: &str) -> bool {
        self.service(service_id).is_some()
    }

    pub fn is_feature_selected(
        &self,
        service_id: &str,
        sub_service_id: &str,
        feature_id: &str,
    ) -> bool {
        self.feature(service_id, sub_service_id, feature_id).is_some()
    }

    /// Flat projection: ids of the top-level services, in selection order.
    pub fn selected_service_ids(&self) -> Vec<&str> {
        self.selected_services.iter().map(|s| s.id.as_str()).collect()
    }

    /// 已選子服務數量 (元件數)
    pub fn component_count(&self, service_id: &str) -> usize {
        self.service(service_id)
            .map(|s| s.selected_sub_services.len())
            .unwrap_or(0)
    }

    pub fn feature_count(&self, service_id: &str) -> usize {
        self.service(service_id)
            .map(SelectedService::feature_count)
            .unwrap_or(0)
    }
}
