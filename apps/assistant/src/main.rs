use std::{ffi::OsStr, fs, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{
    attachment, render, AnalysisClient, AssistantHandle, Attachment, AttachmentTracker, FormFields,
    WorkflowEvent, WorkflowState,
};
use shared::domain::FieldName;
use tracing::warn;

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides the configured analysis service base address.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, default_value = "")]
    product_name: String,
    #[arg(long, default_value = "")]
    product_description: String,
    #[arg(long, default_value = "")]
    price: String,
    #[arg(long, default_value = "")]
    company_url: String,
    #[arg(long, default_value = "")]
    competitors: String,
    #[arg(long, default_value = "")]
    additional_notes: String,
    /// Optional document to attach to the analysis request.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = config::normalize_api_base_url(&api_url);
    }

    let mut fields = FormFields::new();
    fields.set_field(FieldName::ProductName, args.product_name);
    fields.set_field(FieldName::ProductDescription, args.product_description);
    fields.set_field(FieldName::Price, args.price);
    fields.set_field(FieldName::CompanyUrl, args.company_url);
    fields.set_field(FieldName::Competitors, args.competitors);
    fields.set_field(FieldName::AdditionalNotes, args.additional_notes);

    let tracker = AttachmentTracker::new();
    if let Some(path) = &args.file {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read attachment '{}'", path.display()))?;
        let filename = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("attachment")
            .to_string();
        tracker
            .select_file(Attachment {
                filename,
                mime_type: None,
                bytes,
            })
            .await;

        // Cosmetic upload feedback; never gates the submission below.
        if let Some(mut progress) = tracker.subscribe_progress().await {
            tokio::spawn(async move {
                while progress.changed().await.is_ok() {
                    let value = *progress.borrow();
                    println!("Uploading attachment... {value}%");
                    if value >= attachment::PROGRESS_COMPLETE {
                        break;
                    }
                }
            });
        }
    }

    let client: Arc<dyn AssistantHandle> = Arc::new(AnalysisClient::new(settings.api_base_url));

    if let Err(err) = client.health_check().await {
        warn!("analysis service health check failed: {err}");
    }

    let mut events = client.subscribe_events();
    let notices = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                WorkflowEvent::SubmissionStarted => println!("Analyzing..."),
                WorkflowEvent::AnalysisReady(_) => {
                    println!("Analysis completed successfully!")
                }
                WorkflowEvent::SubmissionFailed(message) => {
                    eprintln!("Analysis failed: {message}")
                }
            }
        }
    });

    let attachment = tracker.current().await;
    let dispatched = client.submit(&fields, attachment).await;

    let outcome = if !dispatched {
        Err(anyhow!("a submission is already in flight"))
    } else {
        match client.workflow_state().await {
            WorkflowState::Succeeded(result) => {
                print_panels(&result);
                Ok(())
            }
            WorkflowState::Failed(message) => Err(anyhow!(message)),
            other => Err(anyhow!("submission ended in unexpected state: {other:?}")),
        }
    };

    notices.abort();
    outcome
}

fn print_panels(result: &shared::protocol::AnalysisResult) {
    let Some(panels) = render::panels(Some(result)) else {
        return;
    };

    println!();
    println!("Company Analysis");
    println!("  Market Position: {}", panels.company.market_position);
    print_list("  Key Challenges:", &panels.company.challenges);
    print_list("  Opportunities:", &panels.company.opportunities);

    println!();
    println!("Sales Strategy");
    println!("  Value Proposition: {}", panels.strategy.value_proposition);
    print_list("  Key Points:", &panels.strategy.key_points);
    print_list("  Recommendations:", &panels.strategy.recommendations);
}

fn print_list(heading: &str, items: &[String]) {
    println!("{heading}");
    for (index, item) in items.iter().enumerate() {
        println!("    {}. {item}", index + 1);
    }
}
