use clap::Parser;
use lead_intake::adapters::{LogOpener, MessagingLinkDelivery, SimulatedDelivery};
use lead_intake::config::cli::{Command, ContactArgs, SelectionArgs};
use lead_intake::core::summary::{render_message, render_review};
use lead_intake::domain::ports::DeliveryAdapter;
use lead_intake::domain::model::DeliveryOutcome;
use lead_intake::utils::error::ErrorSeverity;
use lead_intake::utils::{logger, validation::Validate};
use lead_intake::{
    Catalog, CatalogIndex, CliConfig, ContactInfo, DeliveryMode, IntakeConfig, IntakeError,
    SelectionSession,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting lead-intake CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        if let IntakeError::ValidationFailed(report) = &e {
            for (field, message) in &report.field_errors {
                eprintln!("   {}: {}", field, message);
            }
        }
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> lead_intake::Result<()> {
    // 載入並驗證配置
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            IntakeConfig::from_file(path)?
        }
        None => IntakeConfig::default(),
    };
    if let Some(path) = &cli.catalog {
        config.catalog.path = Some(path.clone());
    }

    match cli.command {
        Command::Catalog { category } => {
            config.validate()?;
            let catalog = config.load_catalog()?;
            print_catalog(&catalog, category.as_deref());
        }
        Command::Preview { selection, contact } => {
            config.validate()?;
            let session = build_session(&config, &selection)?;
            let contact = ContactInfo::from(contact);

            print!("{}", render_review(&session.summaries()));
            println!();
            println!("{}", render_message(&session.summaries(), &contact));
        }
        Command::Submit {
            selection,
            contact,
            mode,
            recipient,
        } => {
            if let Some(mode) = mode {
                config.delivery.mode = mode.into();
                tracing::info!("🔧 Delivery mode overridden to: {:?}", config.delivery.mode);
            }
            if recipient.is_some() {
                config.delivery.recipient_id = recipient;
            }
            config.validate()?;

            let session = build_session(&config, &selection)?;
            submit(&config, &session, contact).await?;
        }
    }

    Ok(())
}

fn build_session(
    config: &IntakeConfig,
    selection: &SelectionArgs,
) -> lead_intake::Result<SelectionSession> {
    let catalog = config.load_catalog()?;
    let session = SelectionSession::new(Arc::new(CatalogIndex::new(catalog)));

    for service_id in &selection.quick_add {
        session.quick_add(service_id);
    }
    for action in selection.to_actions()? {
        session.dispatch(&action);
    }

    tracing::debug!(
        "Selection: {}",
        serde_json::to_string(session.snapshot().as_ref())?
    );
    Ok(session)
}

async fn submit(
    config: &IntakeConfig,
    session: &SelectionSession,
    contact: ContactArgs,
) -> lead_intake::Result<()> {
    let adapter: Box<dyn DeliveryAdapter> = match config.delivery.mode {
        DeliveryMode::Simulated => Box::new(SimulatedDelivery::from_settings(config)),
        DeliveryMode::MessagingLink => Box::new(MessagingLinkDelivery::from_settings(
            config,
            Arc::new(LogOpener),
        )?),
    };

    let receipt = session.submit(adapter.as_ref(), &contact.into()).await?;

    match receipt.outcome {
        DeliveryOutcome::Accepted => {
            println!("✅ Request sent to the sales team ({})", receipt.submitted_at.to_rfc3339());
        }
        DeliveryOutcome::HandedOff { url } => {
            println!("📨 Open this link to send your request:");
            println!("{}", url);
        }
    }
    Ok(())
}

fn print_catalog(catalog: &Catalog, category: Option<&str>) {
    for name in catalog.categories() {
        if category.is_some_and(|c| c != name) {
            continue;
        }
        println!("📂 {}", name);
        for service in catalog.services_in_category(name) {
            println!("  {} ({})", service.name, service.id);
            for sub in &service.sub_services {
                println!("    {} ({})", sub.name, sub.id);
                for feature in &sub.features {
                    let marker = if feature.default_included() { "*" } else { " " };
                    println!("      {} {} ({})", marker, feature.name, feature.id);
                    for option in &feature.options {
                        let choices: Vec<&str> =
                            option.choices.iter().map(|c| c.id.as_str()).collect();
                        println!(
                            "          {} ({}): {}",
                            option.name,
                            option.id,
                            choices.join(", ")
                        );
                    }
                }
            }
        }
    }
}
