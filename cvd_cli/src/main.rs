use clap::{Args, Parser, Subcommand};
use cvd_core::*;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prime-cvd")]
#[command(about = "PRIME cardiovascular risk calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate baseline and post-treatment risk for one patient
    Assess(AssessArgs),

    /// Assess a cohort of patients from CSV
    Batch {
        /// Input CSV with one patient per row
        #[arg(long)]
        input: PathBuf,

        /// Output CSV (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the therapies known to the calculator
    Therapies,
}

#[derive(Args)]
struct AssessArgs {
    /// Age in years (30-100)
    #[arg(long, default_value_t = 65)]
    age: u32,

    /// Sex (male or female)
    #[arg(long, default_value = "male")]
    sex: Sex,

    /// Current smoker
    #[arg(long)]
    smoker: bool,

    /// Diabetes mellitus
    #[arg(long)]
    diabetes: bool,

    /// Coronary artery disease
    #[arg(long)]
    cad: bool,

    /// Cerebrovascular disease
    #[arg(long)]
    stroke: bool,

    /// Peripheral artery disease
    #[arg(long)]
    pad: bool,

    /// Total cholesterol (mmol/L)
    #[arg(long, default_value_t = 5.0)]
    total_chol: f64,

    /// HDL-C (mmol/L)
    #[arg(long, default_value_t = 1.0)]
    hdl: f64,

    /// LDL-C (mmol/L)
    #[arg(long, default_value_t = 3.5)]
    ldl: f64,

    /// Systolic blood pressure (mmHg)
    #[arg(long, default_value_t = 140)]
    sbp: u32,

    /// eGFR (mL/min/1.73m²)
    #[arg(long, default_value_t = 80)]
    egfr: u32,

    /// hs-CRP (mg/L)
    #[arg(long, default_value_t = 2.0)]
    crp: f64,

    /// Statin the patient already takes
    #[arg(long, default_value = NO_THERAPY)]
    current_therapy: String,

    /// Statin to prescribe
    #[arg(long, default_value = "Rosuvastatin 10 mg")]
    prescribed_therapy: String,

    /// Add-on therapy (ezetimibe, pcsk9, inclisiran); repeatable
    #[arg(long = "add-on")]
    add_ons: Vec<AddOn>,

    /// LDL-C target (mmol/L); defaults to the configured target
    #[arg(long)]
    target_ldl: Option<f64>,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,

    /// Write a report for this patient name
    #[arg(long)]
    report_name: Option<String>,

    /// Directory for the report (defaults to the configured report dir)
    #[arg(long, requires = "report_name")]
    report_dir: Option<PathBuf>,

    /// Report format (text or json)
    #[arg(long, default_value = "text")]
    report_format: ReportFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        cvd_core::logging::init_with_level("debug");
    } else {
        cvd_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.validate()?;
    tracing::debug!(
        "Config loaded: target LDL {} mmol/L, reduction ceiling {}%",
        config.treatment.default_target_ldl,
        config.treatment.max_total_reduction_percent
    );

    let catalog = TherapyCatalog::with_custom(&config.therapies.custom);
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    tracing::debug!("Therapy catalog ready with {} entries", catalog.len());

    let engine = RiskEngine::new(&catalog, &config.treatment);

    match cli.command {
        Commands::Assess(args) => cmd_assess(args, &engine, &config),
        Commands::Batch { input, output } => cmd_batch(input, output, &engine, &config),
        Commands::Therapies => {
            cmd_therapies(&catalog);
            Ok(())
        }
    }
}

fn cmd_assess(args: AssessArgs, engine: &RiskEngine<'_>, config: &Config) -> Result<()> {
    let vascular = VascularHistory {
        coronary_artery_disease: args.cad,
        cerebrovascular_disease: args.stroke,
        peripheral_artery_disease: args.pad,
    };

    let profile = PatientProfile {
        age: args.age,
        sex: args.sex,
        systolic_bp: args.sbp,
        total_cholesterol: args.total_chol,
        hdl: args.hdl,
        ldl: args.ldl,
        smoker: args.smoker,
        diabetes: args.diabetes,
        egfr: args.egfr,
        crp: args.crp,
        vascular_disease_count: vascular.count(),
    };

    let plan = TreatmentPlan {
        current_therapy: Some(args.current_therapy),
        prescribed_therapy: Some(args.prescribed_therapy),
        add_ons: args.add_ons.into_iter().collect(),
        target_ldl: args
            .target_ldl
            .unwrap_or(config.treatment.default_target_ldl),
    };

    for id in [&plan.current_therapy, &plan.prescribed_therapy]
        .into_iter()
        .flatten()
    {
        if cvd_core::catalog::is_therapy(Some(id)) && !engine.catalog().contains(id) {
            tracing::warn!("Therapy '{}' not in catalog", id);
            eprintln!("Warning: '{}' is not in the therapy catalog; assuming no effect.", id);
        }
    }

    if let Err(e) = validate_inputs(&profile, &plan) {
        if let Error::Validation(ref errors) = e {
            eprintln!("Invalid patient data:");
            for error in errors {
                eprintln!("  - {}", error);
            }
        }
        return Err(e);
    }

    let assessment = engine.assess(&profile, &plan)?;
    tracing::info!(
        "Assessment complete: baseline {}%, final {:.2}%",
        assessment.baseline_risk_percent,
        assessment.final_risk_percent
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        display_assessment(&assessment);
    }

    if let Some(name) = args.report_name {
        let report = Report::new(
            PatientIdentity {
                name,
                age: profile.age,
                sex: profile.sex,
            },
            profile.ldl,
            assessment,
        )?;
        let dir = args
            .report_dir
            .unwrap_or_else(|| config.report.output_dir.clone());
        let path = report.write_to_dir(&dir, args.report_format)?;
        tracing::info!("Report {} written to {}", report.report_id, path.display());

        if args.json {
            eprintln!("Report written to {}", path.display());
        } else {
            println!("✓ Report written to {}", path.display());
        }
    }

    Ok(())
}

fn cmd_batch(
    input: PathBuf,
    output: Option<PathBuf>,
    engine: &RiskEngine<'_>,
    config: &Config,
) -> Result<()> {
    tracing::info!("Reading cohort from {}", input.display());
    let reader = BufReader::new(File::open(&input)?);
    let cache = BaselineRiskCache::new();
    let target = config.treatment.default_target_ldl;

    let summary = match &output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let writer = BufWriter::new(File::create(path)?);
            run_cohort(reader, writer, engine, &cache, target)?
        }
        None => run_cohort(reader, io::stdout().lock(), engine, &cache, target)?,
    };

    eprintln!(
        "✓ Assessed {} patients ({} failed)",
        summary.processed, summary.failed
    );
    if let Some(path) = output {
        eprintln!("  Output: {}", path.display());
    }

    Ok(())
}

fn cmd_therapies(catalog: &TherapyCatalog) {
    println!("Statins:");
    for entry in catalog.entries() {
        println!("  {:<24} {:>5.1}% LDL-C reduction", entry.id, entry.ldl_reduction_percent);
    }
    println!();
    println!("Add-ons:");
    for add_on in AddOn::ALL {
        println!(
            "  {:<24} {:>5.1}% LDL-C reduction",
            add_on.to_string(),
            add_on.ldl_reduction_percent()
        );
    }
}

fn display_assessment(assessment: &RiskAssessment) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  PRIME CVD RISK ASSESSMENT");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Baseline 10-Year Risk: {:.1}%",
        assessment.baseline_risk_percent
    );
    println!(
        "  Projected LDL-C: {:.1} mmol/L ({:.0}% reduction)",
        assessment.projected_ldl, assessment.total_ldl_reduction_percent
    );
    if assessment.uncapped_ldl_reduction_percent > assessment.total_ldl_reduction_percent {
        println!(
            "  → Combined reduction of {:.0}% capped",
            assessment.uncapped_ldl_reduction_percent
        );
    }
    println!(
        "  Post-Treatment Risk: {:.1}% ({:.1}% absolute reduction)",
        assessment.final_risk_percent, assessment.absolute_risk_reduction
    );
    println!(
        "  LDL-C Target {:.1} mmol/L: {}",
        assessment.target_ldl,
        if assessment.target_met {
            "achieved"
        } else {
            "not achieved"
        }
    );
    println!();
    println!("  Clinical Recommendations");
    println!("  → {}", assessment.recommendation);
    println!();
}
