use lead_intake::{
    apply, toggle_feature, toggle_service, toggle_sub_service, update_option, SelectionAction,
    SelectionModel,
};

/// A model with some depth: two services, nested sub-services, features and options.
fn populated() -> SelectionModel {
    let m = toggle_service(&SelectionModel::new(), "website-design");
    let m = toggle_feature(&m, "seo", "on-page-seo", "keyword-research");
    let m = update_option(
        &m,
        "seo",
        "on-page-seo",
        "keyword-research",
        "keyword-research-depth",
        "basic-keyword-research",
    );
    let m = toggle_feature(&m, "seo", "on-page-seo", "meta-tags-optimization");
    let m = toggle_sub_service(&m, "seo", "technical-seo");
    toggle_feature(&m, "website-design", "landing-page", "landing-page-design")
}

#[test]
fn test_double_feature_toggle_restores_model() {
    let models = vec![
        toggle_sub_service(&SelectionModel::new(), "seo", "on-page-seo"),
        populated(),
    ];

    let cases = [
        ("seo", "on-page-seo", "keyword-research"),
        ("seo", "on-page-seo", "image-optimization"),
        ("seo", "technical-seo", "site-audit"),
        ("website-design", "landing-page", "landing-page-form"),
    ];

    for model in &models {
        for (s, ss, f) in cases {
            // 只有在父層已存在且功能尚未選取時，兩次切換才會回到原狀
            if model.sub_service(s, ss).is_none() || model.feature(s, ss, f).is_some() {
                continue;
            }
            let once = toggle_feature(model, s, ss, f);
            assert_ne!(&once, model, "toggle of {}/{}/{} must change the model", s, ss, f);
            assert_eq!(&toggle_feature(&once, s, ss, f), model);
        }
    }
}

#[test]
fn test_double_service_toggle_restores_model() {
    let empty = SelectionModel::new();
    let once = toggle_service(&empty, "ecommerce-website");
    assert!(once.is_service_selected("ecommerce-website"));
    assert_eq!(toggle_service(&once, "ecommerce-website"), empty);

    let model = populated();
    let once = toggle_service(&model, "branding");
    assert_eq!(toggle_service(&once, "branding"), model);
}

#[test]
fn test_removing_service_cascades() {
    let model = populated();
    assert!(model.feature("seo", "on-page-seo", "keyword-research").is_some());

    let removed = toggle_service(&model, "seo");
    assert!(removed.service("seo").is_none());
    assert!(removed.sub_service("seo", "on-page-seo").is_none());
    assert!(removed.sub_service("seo", "technical-seo").is_none());
    assert!(removed.feature("seo", "on-page-seo", "keyword-research").is_none());
    assert_eq!(
        removed.option_choice(
            "seo",
            "on-page-seo",
            "keyword-research",
            "keyword-research-depth"
        ),
        None
    );

    // 重新加入服務時不應殘留舊的子項目
    let readded = toggle_service(&removed, "seo");
    assert!(readded.service("seo").unwrap().selected_sub_services.is_empty());
    assert!(readded.is_service_selected("website-design"));
}

#[test]
fn test_removing_sub_service_cascades() {
    let model = populated();
    let removed = toggle_sub_service(&model, "seo", "on-page-seo");
    assert!(removed.feature("seo", "on-page-seo", "keyword-research").is_none());
    assert!(removed.sub_service("seo", "technical-seo").is_some());
}

#[test]
fn test_feature_toggle_creates_exactly_the_missing_parents() {
    let model = toggle_service(&SelectionModel::new(), "website-design");
    let next = toggle_feature(&model, "seo", "off-page-seo", "guest-posting");

    assert_eq!(next.selected_service_ids(), vec!["website-design", "seo"]);
    let seo = next.service("seo").unwrap();
    assert_eq!(seo.selected_sub_services.len(), 1);
    assert_eq!(seo.selected_sub_services[0].id, "off-page-seo");
    assert_eq!(seo.selected_sub_services[0].selected_features.len(), 1);
    assert_eq!(
        seo.selected_sub_services[0].selected_features[0].id,
        "guest-posting"
    );
    assert!(seo.selected_sub_services[0].selected_features[0]
        .selected_options
        .is_empty());
    assert_eq!(next.service("website-design"), model.service("website-design"));
}

#[test]
fn test_option_last_write_wins() {
    for start in [SelectionModel::new(), populated()] {
        let first = update_option(
            &start,
            "seo",
            "on-page-seo",
            "keyword-research",
            "keyword-research-depth",
            "basic-keyword-research",
        );
        let second = update_option(
            &first,
            "seo",
            "on-page-seo",
            "keyword-research",
            "keyword-research-depth",
            "comprehensive-keyword-research",
        );

        let feature = second.feature("seo", "on-page-seo", "keyword-research").unwrap();
        let matching: Vec<_> = feature
            .selected_options
            .iter()
            .filter(|o| o.option_id == "keyword-research-depth")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].choice_id, "comprehensive-keyword-research");
    }
}

#[test]
fn test_sibling_ids_stay_unique() {
    let mut model = SelectionModel::new();
    for _ in 0..3 {
        model = update_option(&model, "seo", "on-page-seo", "keyword-research", "depth", "a");
        model = update_option(&model, "seo", "on-page-seo", "keyword-research", "depth", "b");
    }
    model = toggle_sub_service(&model, "seo", "technical-seo");

    assert_eq!(model.len(), 1);
    let seo = model.service("seo").unwrap();
    assert_eq!(seo.selected_sub_services.len(), 2);
    let feature = model.feature("seo", "on-page-seo", "keyword-research").unwrap();
    assert_eq!(feature.selected_options.len(), 1);
}

#[test]
fn test_selection_order_is_insertion_order() {
    let actions: Vec<SelectionAction> = ["website-design", "seo", "social-media-management"]
        .iter()
        .map(|id| SelectionAction::ToggleService {
            service_id: id.to_string(),
        })
        .collect();
    let model = actions
        .iter()
        .fold(SelectionModel::new(), |m, a| apply(&m, a));
    assert_eq!(
        model.selected_service_ids(),
        vec!["website-design", "seo", "social-media-management"]
    );

    let model = toggle_service(&model, "seo");
    let model = toggle_service(&model, "seo");
    assert_eq!(
        model.selected_service_ids(),
        vec!["website-design", "social-media-management", "seo"]
    );
}

#[test]
fn test_actions_deserialize_from_json() -> anyhow::Result<()> {
    let json = r#"[
        {"action": "toggle_service", "service_id": "seo"},
        {
            "action": "toggle_feature",
            "service_id": "seo",
            "sub_service_id": "on-page-seo",
            "feature_id": "keyword-research"
        },
        {"action": "clear"}
    ]"#;
    let actions: Vec<SelectionAction> = serde_json::from_str(json)?;
    assert_eq!(actions.len(), 3);
    let after_two = apply(&apply(&SelectionModel::new(), &actions[0]), &actions[1]);
    assert!(after_two.is_feature_selected("seo", "on-page-seo", "keyword-research"));
    assert!(apply(&after_two, &actions[2]).is_empty());
    Ok(())
}
