//! Pure transforms over [`SelectionModel`].
//!
//! Every operation takes the current model by reference and returns a new one.
//! Ids are never checked against the catalog here: a missing id simply means
//! "not selected yet", and orphans are dropped later by the summary serializer.

use crate::domain::selection::{
    SelectedFeature, SelectedOption, SelectedService, SelectedSubService, SelectionModel,
};
use serde::{Deserialize, Serialize};

pub fn toggle_service(model: &SelectionModel, service_id: &str) -> SelectionModel {
    let mut next = model.clone();

    if next.is_service_selected(service_id) {
        next.selected_services.retain(|s| s.id != service_id);
        tracing::debug!(service = service_id, "service removed");
    } else {
        next.selected_services.push(SelectedService::new(service_id));
        tracing::debug!(service = service_id, "service added");
    }

    next
}

pub fn toggle_sub_service(
    model: &SelectionModel,
    service_id: &str,
    sub_service_id: &str,
) -> SelectionModel {
    let mut next = model.clone();

    let Some(service) = service_mut(&mut next, service_id) else {
        // 父服務不存在：連同子服務一起建立，這條路徑只會新增
        tracing::debug!(service = service_id, sub_service = sub_service_id, "sub-service added");
        next.selected_services.push(SelectedService {
            id: service_id.to_string(),
            selected_sub_services: vec![SelectedSubService::new(sub_service_id)],
        });
        return next;
    };

    let subs = &mut service.selected_sub_services;
    if subs.iter().any(|s| s.id == sub_service_id) {
        subs.retain(|s| s.id != sub_service_id);
        tracing::debug!(service = service_id, sub_service = sub_service_id, "sub-service removed");
    } else {
        subs.push(SelectedSubService::new(sub_service_id));
        tracing::debug!(service = service_id, sub_service = sub_service_id, "sub-service added");
    }

    next
}

pub fn toggle_feature(
    model: &SelectionModel,
    service_id: &str,
    sub_service_id: &str,
    feature_id: &str,
) -> SelectionModel {
    let mut next = model.clone();

    let Some(service) = service_mut(&mut next, service_id) else {
        tracing::debug!(
            service = service_id,
            feature = feature_id,
            "feature added with new parents"
        );
        next.selected_services.push(SelectedService {
            id: service_id.to_string(),
            selected_sub_services: vec![SelectedSubService {
                id: sub_service_id.to_string(),
                selected_features: vec![SelectedFeature::new(feature_id)],
            }],
        });
        return next;
    };

    let Some(sub) = sub_service_mut(service, sub_service_id) else {
        tracing::debug!(
            sub_service = sub_service_id,
            feature = feature_id,
            "feature added with new parent"
        );
        service.selected_sub_services.push(SelectedSubService {
            id: sub_service_id.to_string(),
            selected_features: vec![SelectedFeature::new(feature_id)],
        });
        return next;
    };

    let features = &mut sub.selected_features;
    let removed = features.iter().any(|f| f.id == feature_id);
    if removed {
        features.retain(|f| f.id != feature_id);
    } else {
        features.push(SelectedFeature::new(feature_id));
    }
    tracing::debug!(
        service = service_id,
        sub_service = sub_service_id,
        feature = feature_id,
        removed,
        "feature toggled"
    );

    next
}

/// Upserts the choice for `(feature, option)`; the latest call wins.
pub fn update_option(
    model: &SelectionModel,
    service_id: &str,
    sub_service_id: &str,
    feature_id: &str,
    option_id: &str,
    choice_id: &str,
) -> SelectionModel {
    tracing::debug!(
        service = service_id,
        sub_service = sub_service_id,
        feature = feature_id,
        option = option_id,
        choice = choice_id,
        "option updated"
    );
    let mut next = model.clone();
    let selected = SelectedOption {
        option_id: option_id.to_string(),
        choice_id: choice_id.to_string(),
    };
    let feature_with_option = || SelectedFeature {
        id: feature_id.to_string(),
        selected_options: vec![selected.clone()],
    };

    let Some(service) = service_mut(&mut next, service_id) else {
        next.selected_services.push(SelectedService {
            id: service_id.to_string(),
            selected_sub_services: vec![SelectedSubService {
                id: sub_service_id.to_string(),
                selected_features: vec![feature_with_option()],
            }],
        });
        return next;
    };

    let Some(sub) = sub_service_mut(service, sub_service_id) else {
        service.selected_sub_services.push(SelectedSubService {
            id: sub_service_id.to_string(),
            selected_features: vec![feature_with_option()],
        });
        return next;
    };

    let Some(feature) = sub.selected_features.iter_mut().find(|f| f.id == feature_id) else {
        sub.selected_features.push(feature_with_option());
        return next;
    };

    match feature
        .selected_options
        .iter_mut()
        .find(|o| o.option_id == option_id)
    {
        Some(existing) => existing.choice_id = selected.choice_id,
        None => feature.selected_options.push(selected),
    }

    next
}

fn service_mut<'a>(
    model: &'a mut SelectionModel,
    service_id: &str,
) -> Option<&'a mut SelectedService> {
    model
        .selected_services
        .iter_mut()
        .find(|s| s.id == service_id)
}

fn sub_service_mut<'a>(
    service: &'a mut SelectedService,
    sub_service_id: &str,
) -> Option<&'a mut SelectedSubService> {
    service
        .selected_sub_services
        .iter_mut()
        .find(|s| s.id == sub_service_id)
}

/// A mutation intent, as dispatched by a UI or replayed from a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SelectionAction {
    ToggleService {
        service_id: String,
    },
    ToggleSubService {
        service_id: String,
        sub_service_id: String,
    },
    ToggleFeature {
        service_id: String,
        sub_service_id: String,
        feature_id: String,
    },
    UpdateOption {
        service_id: String,
        sub_service_id: String,
        feature_id: String,
        option_id: String,
        choice_id: String,
    },
    Clear,
}

/// Reducer over [`SelectionAction`].
pub fn apply(model: &SelectionModel, action: &SelectionAction) -> SelectionModel {
    match action {
        SelectionAction::ToggleService { service_id } => toggle_service(model, service_id),
        SelectionAction::ToggleSubService {
            service_id,
            sub_service_id,
        } => toggle_sub_service(model, service_id, sub_service_id),
        SelectionAction::ToggleFeature {
            service_id,
            sub_service_id,
            feature_id,
        } => toggle_feature(model, service_id, sub_service_id, feature_id),
        SelectionAction::UpdateOption {
            service_id,
            sub_service_id,
            feature_id,
            option_id,
            choice_id,
        } => update_option(
            model,
            service_id,
            sub_service_id,
            feature_id,
            option_id,
            choice_id,
        ),
        SelectionAction::Clear => SelectionModel::new(),
    }
}
