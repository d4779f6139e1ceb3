//! Selection policies layered on top of the primitive mutations.
//!
//! These are the only places that read catalog flags such as `included`;
//! [`crate::core::mutation`] itself stays catalog-agnostic.

use crate::core::mutation::{toggle_feature, toggle_service, toggle_sub_service, update_option};
use crate::domain::catalog::Service;
use crate::domain::selection::SelectionModel;
use std::collections::BTreeMap;

/// Quick add: selects the service and every feature flagged `included`.
///
/// Features that are already selected are left alone, so calling this twice
/// does not undo the first call.
pub fn quick_add(model: &SelectionModel, service: &Service) -> SelectionModel {
    let mut next = if model.is_service_selected(&service.id) {
        model.clone()
    } else {
        toggle_service(model, &service.id)
    };

    for sub in &service.sub_services {
        for feature in sub.features.iter().filter(|f| f.default_included()) {
            if !next.is_feature_selected(&service.id, &sub.id, &feature.id) {
                next = toggle_feature(&next, &service.id, &sub.id, &feature.id);
            }
        }
    }

    tracing::debug!(
        service = %service.id,
        features = next.feature_count(&service.id),
        "quick add applied"
    );
    next
}

/// Desired configuration of one service, edited step by step before being applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub sub_services: Vec<String>,
    pub features: BTreeMap<String, Vec<String>>,
    pub options: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
}

impl ServiceDraft {
    /// 預設：全部子服務 + 所有 included 功能
    pub fn defaults(service: &Service) -> Self {
        let sub_services = service.sub_services.iter().map(|s| s.id.clone()).collect();
        let features = service
            .sub_services
            .iter()
            .map(|s| {
                let included = s
                    .features
                    .iter()
                    .filter(|f| f.default_included())
                    .map(|f| f.id.clone())
                    .collect();
                (s.id.clone(), included)
            })
            .collect();

        Self {
            sub_services,
            features,
            options: BTreeMap::new(),
        }
    }

    /// Starts from what is already selected, or from the defaults when the
    /// service is not selected at all.
    pub fn from_selection(model: &SelectionModel, service: &Service) -> Self {
        let Some(selected) = model.service(&service.id) else {
            return Self::defaults(service);
        };

        let mut draft = Self::default();
        for sub in &selected.selected_sub_services {
            draft.sub_services.push(sub.id.clone());
            draft.features.insert(
                sub.id.clone(),
                sub.selected_features.iter().map(|f| f.id.clone()).collect(),
            );
            for feature in &sub.selected_features {
                let choices = feature
                    .selected_options
                    .iter()
                    .map(|o| (o.option_id.clone(), o.choice_id.clone()))
                    .collect::<BTreeMap<_, _>>();
                if !choices.is_empty() {
                    draft
                        .options
                        .entry(sub.id.clone())
                        .or_default()
                        .insert(feature.id.clone(), choices);
                }
            }
        }
        draft
    }

    pub fn toggle_sub_service(&mut self, sub_service_id: &str) {
        if self.sub_services.iter().any(|s| s == sub_service_id) {
            self.sub_services.retain(|s| s != sub_service_id);
        } else {
            self.sub_services.push(sub_service_id.to_string());
        }
    }

    pub fn toggle_feature(&mut self, sub_service_id: &str, feature_id: &str) {
        let features = self.features.entry(sub_service_id.to_string()).or_default();
        if features.iter().any(|f| f == feature_id) {
            features.retain(|f| f != feature_id);
        } else {
            features.push(feature_id.to_string());
        }
    }

    pub fn select_choice(
        &mut self,
        sub_service_id: &str,
        feature_id: &str,
        option_id: &str,
        choice_id: &str,
    ) {
        self.options
            .entry(sub_service_id.to_string())
            .or_default()
            .entry(feature_id.to_string())
            .or_default()
            .insert(option_id.to_string(), choice_id.to_string());
    }

    fn wants_sub_service(&self, sub_service_id: &str) -> bool {
        self.sub_services.iter().any(|s| s == sub_service_id)
    }

    fn wants_feature(&self, sub_service_id: &str, feature_id: &str) -> bool {
        self.features
            .get(sub_service_id)
            .is_some_and(|f| f.iter().any(|id| id == feature_id))
    }
}

/// Applies a draft with the minimal set of toggles, then upserts its choices.
///
/// Only catalog sub-services and features are compared. Choices are written
/// for drafted features only, so a choice never resurrects a sub-service the
/// draft dropped.
pub fn reconcile(
    model: &SelectionModel,
    service: &Service,
    draft: &ServiceDraft,
) -> SelectionModel {
    let mut next = if model.is_service_selected(&service.id) {
        model.clone()
    } else {
        toggle_service(model, &service.id)
    };

    for sub in &service.sub_services {
        let selected = next.sub_service(&service.id, &sub.id).is_some();
        if selected != draft.wants_sub_service(&sub.id) {
            next = toggle_sub_service(&next, &service.id, &sub.id);
        }
    }

    for sub in service
        .sub_services
        .iter()
        .filter(|s| draft.wants_sub_service(&s.id))
    {
        for feature in &sub.features {
            let selected = next.is_feature_selected(&service.id, &sub.id, &feature.id);
            if selected != draft.wants_feature(&sub.id, &feature.id) {
                next = toggle_feature(&next, &service.id, &sub.id, &feature.id);
            }
        }
    }

    for (sub_id, features) in &draft.options {
        if !draft.wants_sub_service(sub_id) {
            continue;
        }
        for (feature_id, choices) in features {
            if !draft.wants_feature(sub_id, feature_id) {
                continue;
            }
            for (option_id, choice_id) in choices {
                next = update_option(&next, &service.id, sub_id, feature_id, option_id, choice_id);
            }
        }
    }

    next
}
