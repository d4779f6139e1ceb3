//! Joins a [`SelectionModel`] against the catalog and renders it as text.
//!
//! Broken references are skipped at every level; nothing here fails. The
//! outbound message is sent verbatim, so the same input must always render
//! to the same bytes.

use crate::core::contact::ContactInfo;
use crate::domain::catalog::CatalogIndex;
use crate::domain::selection::SelectionModel;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionChoice {
    pub option_name: String,
    pub choice_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSummary {
    pub feature_id: String,
    pub name: String,
    pub option_choices: Vec<OptionChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    pub sub_service_id: String,
    pub name: String,
    pub features: Vec<FeatureSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub service_id: String,
    pub service_name: String,
    pub category: String,
    pub sub_service_names: Vec<String>,
    pub feature_names: Vec<String>,
    pub option_choices: Vec<OptionChoice>,
    pub components: Vec<ComponentSummary>,
}

impl ServiceSummary {
    /// Sub-services that contributed no option choice. The message lists
    /// them by name; the others show up through their choices.
    pub fn unconfigured_components(&self) -> impl Iterator<Item = &ComponentSummary> {
        self.components
            .iter()
            .filter(|c| c.features.iter().all(|f| f.option_choices.is_empty()))
    }
}

pub fn serialize(model: &SelectionModel, index: &CatalogIndex) -> Vec<ServiceSummary> {
    let mut summaries = Vec::with_capacity(model.len());

    for selected in &model.selected_services {
        let Some(service) = index.service(&selected.id) else {
            tracing::debug!(service = %selected.id, "dropping orphan service selection");
            continue;
        };

        let mut components = Vec::new();
        for selected_sub in &selected.selected_sub_services {
            let Some(sub) = index.sub_service(&service.id, &selected_sub.id) else {
                tracing::debug!(
                    service = %service.id,
                    sub_service = %selected_sub.id,
                    "dropping orphan sub-service selection"
                );
                continue;
            };

            let mut features = Vec::new();
            for selected_feature in &selected_sub.selected_features {
                let Some(feature) = index.feature(&service.id, &sub.id, &selected_feature.id) else {
                    continue;
                };

                let option_choices = selected_feature
                    .selected_options
                    .iter()
                    .filter_map(|o| {
                        let option = index.option(&service.id, &sub.id, &feature.id, &o.option_id)?;
                        let choice = index.choice(
                            &service.id,
                            &sub.id,
                            &feature.id,
                            &o.option_id,
                            &o.choice_id,
                        )?;
                        Some(OptionChoice {
                            option_name: option.name.clone(),
                            choice_name: choice.name.clone(),
                        })
                    })
                    .collect();

                features.push(FeatureSummary {
                    feature_id: feature.id.clone(),
                    name: feature.name.clone(),
                    option_choices,
                });
            }

            components.push(ComponentSummary {
                sub_service_id: sub.id.clone(),
                name: sub.name.clone(),
                features,
            });
        }

        summaries.push(ServiceSummary {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            category: service.category.clone(),
            sub_service_names: components.iter().map(|c| c.name.clone()).collect(),
            feature_names: components
                .iter()
                .flat_map(|c| c.features.iter().map(|f| f.name.clone()))
                .collect(),
            option_choices: components
                .iter()
                .flat_map(|c| c.features.iter())
                .flat_map(|f| f.option_choices.iter().cloned())
                .collect(),
            components,
        });
    }

    summaries
}

/// Renders the message handed to the messaging channel.
pub fn render_text(model: &SelectionModel, index: &CatalogIndex, contact: &ContactInfo) -> String {
    render_message(&serialize(model, index), contact)
}

pub fn render_message(summaries: &[ServiceSummary], contact: &ContactInfo) -> String {
    let mut out = String::new();

    out.push_str(&format!("*New Service Request from {}*\n\n", contact.name));
    out.push_str("*Contact Information:*\n");
    out.push_str(&format!("Name: {}\n", contact.name));
    out.push_str(&format!("Email: {}\n", contact.email));
    out.push_str(&format!("Phone: {}\n\n", contact.phone));

    if !contact.message.is_empty() {
        out.push_str(&format!("*Additional Message:*\n{}\n\n", contact.message));
    }

    out.push_str("*Selected Services:*\n");

    for (position, summary) in summaries.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", position + 1, summary.service_name));

        let mut listed = summary.unconfigured_components().peekable();
        if listed.peek().is_some() {
            out.push_str("   *Options:*\n");
            for component in listed {
                out.push_str(&format!("   - {}\n", component.name));
            }
        }

        if !summary.option_choices.is_empty() {
            out.push_str("   *Choices:*\n");
            for pair in &summary.option_choices {
                out.push_str(&format!("   - {}: {}\n", pair.option_name, pair.choice_name));
            }
        }

        out.push('\n');
    }

    out.push_str("*Sent from your website*");
    out
}

/// Plain listing for reviewing a selection before it is sent.
pub fn render_review(summaries: &[ServiceSummary]) -> String {
    if summaries.is_empty() {
        return "No services selected yet\n".to_string();
    }

    let mut out = String::new();
    for summary in summaries {
        out.push_str(&format!(
            "{} [{}] - {} components, {} features\n",
            summary.service_name,
            summary.category,
            summary.components.len(),
            summary.feature_names.len()
        ));
        for component in &summary.components {
            out.push_str(&format!("  + {}\n", component.name));
            for feature in &component.features {
                out.push_str(&format!("    - {}\n", feature.name));
                for pair in &feature.option_choices {
                    out.push_str(&format!("        {}: {}\n", pair.option_name, pair.choice_name));
                }
            }
        }
    }
    out
}
