use crate::utils::error::{IntakeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub name: String,
}

/// A configurable axis on a feature; exactly one of its choices can be active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub included: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FeatureOption>,
}

impl Feature {
    /// 預設是否包含在方案內 (quick add 會依此預選)
    pub fn default_included(&self) -> bool {
        self.included
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubService {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub sub_services: Vec<SubService>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Catalog {
    /// 內建的服務目錄 (data/catalog.json)
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// 依副檔名選擇解析格式
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let catalog = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            other => {
                return Err(IntakeError::InvalidConfigValueError {
                    field: "catalog.path".to_string(),
                    value: path.display().to_string(),
                    reason: format!(
                        "Unsupported catalog format: {}. Use .json or .toml",
                        other.unwrap_or("<none>")
                    ),
                })
            }
        };

        tracing::info!(
            "Loaded catalog from {} ({} services)",
            path.display(),
            catalog.services.len()
        );
        Ok(catalog)
    }

    /// Checks that ids and names are present and unique among siblings.
    pub fn validate(&self) -> Result<()> {
        check_siblings("services", self.services.iter().map(|s| (&s.id, &s.name)))?;

        for service in &self.services {
            let service_path = format!("services.{}", service.id);
            check_siblings(
                &format!("{}.subServices", service_path),
                service.sub_services.iter().map(|s| (&s.id, &s.name)),
            )?;

            for sub in &service.sub_services {
                let sub_path = format!("{}.{}", service_path, sub.id);
                check_siblings(
                    &format!("{}.features", sub_path),
                    sub.features.iter().map(|f| (&f.id, &f.name)),
                )?;

                for feature in &sub.features {
                    let feature_path = format!("{}.{}", sub_path, feature.id);
                    check_siblings(
                        &format!("{}.options", feature_path),
                        feature.options.iter().map(|o| (&o.id, &o.name)),
                    )?;

                    for option in &feature.options {
                        check_siblings(
                            &format!("{}.{}.choices", feature_path, option.id),
                            option.choices.iter().map(|c| (&c.id, &c.name)),
                        )?;
                    }
                }
            }
        }

        Ok(())
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Category names in first-seen order, without duplicates.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.services
            .iter()
            .map(|s| s.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    pub fn services_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Service> {
        self.services.iter().filter(move |s| s.category == category)
    }
}

fn check_siblings<'a>(
    path: &str,
    entries: impl Iterator<Item = (&'a String, &'a String)>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, (id, name)) in entries.enumerate() {
        if id.trim().is_empty() {
            return Err(IntakeError::CatalogError {
                path: format!("{}[{}]", path, index),
                message: "id cannot be empty".to_string(),
            });
        }
        if name.trim().is_empty() {
            return Err(IntakeError::CatalogError {
                path: format!("{}.{}", path, id),
                message: "name cannot be empty".to_string(),
            });
        }
        if !seen.insert(id.as_str()) {
            return Err(IntakeError::CatalogError {
                path: format!("{}.{}", path, id),
                message: "duplicate id among siblings".to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
struct FeatureSlot {
    options: HashMap<String, usize>,
    choices: HashMap<String, HashMap<String, usize>>,
}

#[derive(Debug, Default)]
struct SubServiceSlot {
    features: HashMap<String, (usize, FeatureSlot)>,
}

#[derive(Debug, Default)]
struct ServiceSlot {
    sub_services: HashMap<String, (usize, SubServiceSlot)>,
}

/// Id-keyed index over a catalog, built once so every join step is a map lookup.
#[derive(Debug)]
pub struct CatalogIndex {
    catalog: Catalog,
    services: HashMap<String, (usize, ServiceSlot)>,
}

impl CatalogIndex {
    pub fn new(catalog: Catalog) -> Self {
        let mut services = HashMap::new();

        for (si, service) in catalog.services.iter().enumerate() {
            let mut service_slot = ServiceSlot::default();
            for (ssi, sub) in service.sub_services.iter().enumerate() {
                let mut sub_slot = SubServiceSlot::default();
                for (fi, feature) in sub.features.iter().enumerate() {
                    let mut feature_slot = FeatureSlot::default();
                    for (oi, option) in feature.options.iter().enumerate() {
                        feature_slot.options.insert(option.id.clone(), oi);
                        let choices = option
                            .choices
                            .iter()
                            .enumerate()
                            .map(|(ci, c)| (c.id.clone(), ci))
                            .collect();
                        feature_slot.choices.insert(option.id.clone(), choices);
                    }
                    sub_slot
                        .features
                        .entry(feature.id.clone())
                        .or_insert((fi, feature_slot));
                }
                service_slot
                    .sub_services
                    .entry(sub.id.clone())
                    .or_insert((ssi, sub_slot));
            }
            services
                .entry(service.id.clone())
                .or_insert((si, service_slot));
        }

        Self { catalog, services }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn service(&self, service_id: &str) -> Option<&Service> {
        let (si, _) = self.services.get(service_id)?;
        self.catalog.services.get(*si)
    }

    pub fn sub_service(&self, service_id: &str, sub_service_id: &str) -> Option<&SubService> {
        let (si, slot) = self.services.get(service_id)?;
        let (ssi, _) = slot.sub_services.get(sub_service_id)?;
        self.catalog.services.get(*si)?.sub_services.get(*ssi)
    }

    pub fn feature(
        &self,
        service_id: &str,
        sub_service_id: &str,
        feature_id: &str,
    ) -> Option<&Feature> {
        let (_, slot) = self.services.get(service_id)?;
        let (_, sub_slot) = slot.sub_services.get(sub_service_id)?;
        let (fi, _) = sub_slot.features.get(feature_id)?;
        self.sub_service(service_id, sub_service_id)?
            .features
            .get(*fi)
    }

    pub fn option(
        &self,
        service_id: &str,
        sub_service_id: &str,
        feature_id: &str,
        option_id: &str,
    ) -> Option<&FeatureOption> {
        let oi = self
            .feature_slot(service_id, sub_service_id, feature_id)?
            .options
            .get(option_id)?;
        self.feature(service_id, sub_service_id, feature_id)?
            .options
            .get(*oi)
    }

    pub fn choice(
        &self,
        service_id: &str,
        sub_service_id: &str,
        feature_id: &str,
        option_id: &str,
        choice_id: &str,
    ) -> Option<&Choice> {
        let ci = self
            .feature_slot(service_id, sub_service_id, feature_id)?
            .choices
            .get(option_id)?
            .get(choice_id)?;
        self.option(service_id, sub_service_id, feature_id, option_id)?
            .choices
            .get(*ci)
    }

    fn feature_slot(
        &self,
        service_id: &str,
        sub_service_id: &str,
        feature_id: &str,
    ) -> Option<&FeatureSlot> {
        let (_, slot) = self.services.get(service_id)?;
        let (_, sub_slot) = slot.sub_services.get(sub_service_id)?;
        sub_slot.features.get(feature_id).map(|(_, f)| f)
    }
}

impl From<Catalog> for CatalogIndex {
    fn from(catalog: Catalog) -> Self {
        Self::new(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
  "services": [
    {
      "id": "seo",
      "name": "SEO",
      "category": "Marketing",
      "subServices": [
        {
          "id": "on-page-seo",
          "name": "On-Page SEO",
          "features": [
            {
              "id": "keyword-research",
              "name": "Keyword Research",
              "included": true,
              "options": [
                {
                  "id": "depth",
                  "name": "Research Depth",
                  "choices": [
                    { "id": "basic", "name": "Basic" },
                    { "id": "standard", "name": "Standard" }
                  ]
                }
              ]
            },
            { "id": "meta-tags", "name": "Meta Tags", "included": false }
          ]
        }
      ]
    },
    { "id": "branding", "name": "Branding", "category": "Design", "subServices": [] }
  ]
}"#
    }

    #[test]
    fn test_parse_json_catalog() {
        let catalog = Catalog::from_json_str(sample_json()).unwrap();
        assert_eq!(catalog.services.len(), 2);
        let seo = catalog.service("seo").unwrap();
        assert_eq!(seo.sub_services[0].features.len(), 2);
        assert!(seo.sub_services[0].features[0].default_included());
        assert!(seo.sub_services[0].features[1].options.is_empty());
        assert_eq!(catalog.categories(), vec!["Marketing", "Design"]);
    }

    #[test]
    fn test_duplicate_sibling_ids_are_rejected() {
        let json = r#"{"services": [
            {"id": "a", "name": "A", "category": "x", "subServices": []},
            {"id": "a", "name": "A again", "category": "x", "subServices": []}
        ]}"#;
        match Catalog::from_json_str(json) {
            Err(IntakeError::CatalogError { path, .. }) => assert_eq!(path, "services.a"),
            other => panic!("expected catalog error, got {:?}", other),
        }
    }

    #[test]
    fn test_same_id_under_different_parents_is_allowed() {
        let json = r#"{"services": [
            {"id": "a", "name": "A", "category": "x", "subServices": [
                {"id": "shared", "name": "Shared", "features": []}
            ]},
            {"id": "b", "name": "B", "category": "x", "subServices": [
                {"id": "shared", "name": "Shared", "features": []}
            ]}
        ]}"#;
        assert!(Catalog::from_json_str(json).is_ok());
    }

    #[test]
    fn test_index_lookups() {
        let index = CatalogIndex::new(Catalog::from_json_str(sample_json()).unwrap());
        assert_eq!(index.service("seo").unwrap().name, "SEO");
        assert_eq!(
            index.sub_service("seo", "on-page-seo").unwrap().name,
            "On-Page SEO"
        );
        assert_eq!(
            index
                .choice("seo", "on-page-seo", "keyword-research", "depth", "standard")
                .unwrap()
                .name,
            "Standard"
        );
        assert!(index.service("missing").is_none());
        assert!(index.sub_service("branding", "on-page-seo").is_none());
        assert!(index
            .choice("seo", "on-page-seo", "keyword-research", "depth", "premium")
            .is_none());
        assert!(index.option("seo", "on-page-seo", "meta-tags", "depth").is_none());
    }

    #[test]
    fn test_toml_catalog() {
        let toml_content = r#"
[[services]]
id = "seo"
name = "SEO"
category = "Marketing"

[[services.subServices]]
id = "technical-seo"
name = "Technical SEO"

[[services.subServices.features]]
id = "site-audit"
name = "Technical Site Audit"
included = true
"#;
        let catalog = Catalog::from_toml_str(toml_content).unwrap();
        assert_eq!(
            catalog.services[0].sub_services[0].features[0].id,
            "site-audit"
        );
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();
        let ids: Vec<&str> = catalog.services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["social-media-management", "seo", "website-design"]);
    }
}
