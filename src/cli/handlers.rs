use super::commands::{AnalyzeArgs, CostArgs};
use crate::config::{ConfigError, MergescopeConfig};
use crate::cost::{CostModel, DealType};
use crate::export::{self, CostExport, FactsExport, FindingsExport, OverlapsExport};
use crate::model::{Fact, Finding, Gap, InventorySummary};
use crate::pipeline::{PipelineController, RunInput, RunReport, RunStatus, StageStatus};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Facts/gaps input as the extraction collaborator exports it.
#[derive(Debug, Deserialize)]
struct FactsFile {
    facts: Vec<Fact>,
    #[serde(default)]
    gaps: Vec<Gap>,
}

/// Findings export of a previous run, as `mergescope cost` consumes it.
/// Only the work-item partition matters for pricing.
#[derive(Debug, Default, Deserialize)]
struct FindingsFile {
    #[serde(default)]
    work_items: Vec<Finding>,
}

pub async fn handle_analyze(args: &AnalyzeArgs) -> i32 {
    match run_analysis(args).await {
        Ok(report) => {
            print_summary(&report);
            if report.status == RunStatus::Cancelled {
                2
            } else {
                0
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

async fn run_analysis(args: &AnalyzeArgs) -> Result<RunReport> {
    let deal_type: DealType = args.deal_type.parse()?;

    let facts_file: FactsFile = read_json(&args.input)
        .with_context(|| format!("reading facts file {}", args.input.display()))?;
    let inventory = match &args.inventory {
        Some(path) => read_json::<InventorySummary>(path)
            .with_context(|| format!("reading inventory file {}", path.display()))?,
        None => InventorySummary::default(),
    };

    let config = build_config(args)?;
    let llm = config.create_client();
    info!(
        provider = llm.name(),
        model = ?llm.model_info(),
        "capability client ready"
    );

    let input = RunInput {
        facts: facts_file.facts,
        gaps: facts_file.gaps,
        inventory,
        deal_type,
        tsa_months: args.tsa_months,
    };
    // Exports cite into these, so keep a copy alongside the run.
    let export_facts = input.facts.clone();
    let export_gaps = input.gaps.clone();

    let controller = PipelineController::new(config, llm);
    let report = controller.run(input).await?;

    if report.status == RunStatus::Completed {
        std::fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;

        let facts = FactsExport::new(report.run_id, export_facts, export_gaps);
        export::write_json(&facts, &args.out_dir.join("facts.json"))?;
        export::write_json(
            &OverlapsExport::from_report(&report),
            &args.out_dir.join("overlaps.json"),
        )?;
        export::write_json(
            &FindingsExport::from_report(&report)?,
            &args.out_dir.join("findings.json"),
        )?;
        export::write_json(
            &CostExport::from_report(&report),
            &args.out_dir.join("costs.json"),
        )?;
    }

    Ok(report)
}

fn build_config(args: &AnalyzeArgs) -> Result<MergescopeConfig> {
    let mut config = match MergescopeConfig::from_env() {
        Ok(config) => config,
        // The --provider flag can stand in for the environment variable.
        Err(ConfigError::MissingProvider) if args.provider.is_some() => {
            MergescopeConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(report: &RunReport) {
    println!("Run {} ({:?})", report.run_id, report.status);
    for (domain, status) in &report.domains {
        let overlap = describe_stage(&status.overlap, "candidates");
        let reasoning = describe_stage(&status.reasoning, "findings");
        let mut line = format!("  {:16} overlap: {:24} reasoning: {}", domain.to_string(), overlap, reasoning);
        if status.rejected_findings > 0 || status.rejected_pairs > 0 {
            line.push_str(&format!(
                "  (rejected: {} findings, {} pairs)",
                status.rejected_findings, status.rejected_pairs
            ));
        }
        println!("{}", line);
    }

    if report.status == RunStatus::Completed {
        println!("Findings: {}", report.findings.len());
        let total: f64 = report.cost_estimates.iter().map(|e| e.adjusted_cost).sum();
        println!(
            "Estimated one-off cost: {:.0} across {} work items",
            total,
            report.cost_estimates.len()
        );
        if let Some(tsa) = &report.tsa {
            if tsa.total_cost > 0.0 {
                println!(
                    "TSA: {:.0}/month for {} months = {:.0}",
                    tsa.monthly_cost, tsa.duration_months, tsa.total_cost
                );
            }
        }
    }
}

fn describe_stage(status: &StageStatus, noun: &str) -> String {
    match status {
        StageStatus::Completed { produced } => format!("{} {}", produced, noun),
        StageStatus::Failed { error } => format!("FAILED ({})", error),
    }
}

pub async fn handle_cost(args: &CostArgs) -> i32 {
    match run_costing(args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn run_costing(args: &CostArgs) -> Result<()> {
    let deal_type: DealType = args.deal_type.parse()?;
    let findings_file: FindingsFile = read_json(&args.findings)
        .with_context(|| format!("reading findings export {}", args.findings.display()))?;

    let model = CostModel::default();
    let estimates = model.estimate_all(&findings_file.work_items, deal_type)?;

    let output = serde_json::to_string_pretty(&estimates)?;
    match &args.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("writing cost output to {}", path.display()))?,
        None => println!("{}", output),
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing JSON from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Domain, Entity, FactId, FindingId, FindingKind, WorkPhase, KIND_WORK_ITEM,
    };
    use tempfile::TempDir;

    fn work_item_json() -> String {
        let finding = Finding {
            id: FindingId::new(KIND_WORK_ITEM, Domain::IdentityAccess, 1),
            domain: Domain::IdentityAccess,
            kind: FindingKind::WorkItem {
                phase: WorkPhase::Day100,
                cost_category: Domain::IdentityAccess,
                base_cost: 100_000.0,
            },
            description: "consolidate identity providers".to_string(),
            citations: vec![FactId::new(Entity::Target, Domain::IdentityAccess, 1)],
            overlap_id: None,
            integration_related: false,
            target_action: None,
            integration_option: None,
            merged_from: Vec::new(),
        };
        serde_json::json!({ "work_items": [finding] }).to_string()
    }

    #[tokio::test]
    async fn test_cost_handler_writes_estimates() {
        let dir = TempDir::new().unwrap();
        let findings_path = dir.path().join("findings.json");
        let out_path = dir.path().join("costs.json");
        std::fs::write(&findings_path, work_item_json()).unwrap();

        let args = CostArgs {
            findings: findings_path,
            deal_type: "carveout".to_string(),
            output: Some(out_path.clone()),
        };

        assert_eq!(handle_cost(&args).await, 0);

        let estimates: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(out_path).unwrap()).unwrap();
        assert_eq!(estimates.len(), 1);
        assert_eq!(estimates[0]["multiplier"], 2.5);
        assert_eq!(estimates[0]["adjusted_cost"], 250_000.0);
    }

    #[tokio::test]
    async fn test_cost_handler_rejects_unknown_deal_type() {
        let dir = TempDir::new().unwrap();
        let findings_path = dir.path().join("findings.json");
        std::fs::write(&findings_path, work_item_json()).unwrap();

        let args = CostArgs {
            findings: findings_path,
            deal_type: "hostile-takeover".to_string(),
            output: None,
        };

        assert_eq!(handle_cost(&args).await, 1);
    }
}
