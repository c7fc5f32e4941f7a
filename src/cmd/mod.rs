use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use rand::RngExt;
use schemars::JsonSchema;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use crate::driver::{Driver, GenerationJob, ProcessBackend, RunConfig};

#[derive(Parser)]
#[command(name = "tpcc-dumpgen")]
#[command(version)]
#[command(
    about = "Generate a TPC-C-compatible *.sql dump for MySQL and PostgreSQL",
    long_about = None
)]
pub struct Cli {
    /// Output directory
    #[arg(short, long, value_name = "DIR", required_unless_present = "completions")]
    pub output: Option<PathBuf>,

    /// Number of warehouses
    #[arg(short, long, value_name = "W", required_unless_present = "completions")]
    pub warehouses: Option<u64>,

    /// Constant C used in the NUrand() function for the C_LAST column
    /// (default: random in 0..256)
    #[arg(long, value_name = "C")]
    pub nurand_c: Option<u32>,

    /// Path of the dbgen executable
    #[arg(long, value_name = "PATH")]
    pub exe: Option<PathBuf>,

    /// Directory containing the per-table *.sql templates
    #[arg(long, value_name = "DIR", default_value = "templates")]
    pub templates: PathBuf,

    /// Schema name
    #[arg(long, value_name = "QNAME", default_value = "tpcc")]
    pub schema_name: String,

    /// Number of parallel file-generation jobs inside the backend
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Resolve and print the per-table plan without generating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output the plan and results as JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// JSON output for a generation run (statistics omitted on dry runs)
#[derive(Serialize, JsonSchema)]
pub(crate) struct RunJsonOutput {
    output_dir: String,
    schema_name: String,
    warehouses: u64,
    nurand_c: u32,
    dry_run: bool,
    tables: Vec<TableJsonOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<RunJsonStatistics>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct TableJsonOutput {
    template: String,
    files: u64,
    inserts_per_file: u64,
    rows_per_insert: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_file_inserts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_insert_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    initializer: Option<String>,
    total_rows: u64,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct RunJsonStatistics {
    tables_generated: usize,
    files_written: u64,
    rows_generated: u64,
    elapsed_secs: f64,
    schema_file: String,
}

impl TableJsonOutput {
    fn from_job(job: &GenerationJob) -> Self {
        Self {
            template: job.template.clone(),
            files: job.params.files,
            inserts_per_file: job.params.inserts,
            rows_per_insert: job.params.rows,
            last_file_inserts: job.params.last_inserts,
            last_insert_rows: job.params.last_rows,
            initializer: job.initializer.clone(),
            total_rows: job.params.total_rows(),
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "tpcc-dumpgen", &mut io::stdout());
        return Ok(());
    }

    let (Some(output), Some(warehouses)) = (cli.output, cli.warehouses) else {
        anyhow::bail!("--output and --warehouses are required");
    };
    if warehouses == 0 {
        anyhow::bail!("--warehouses must be at least 1");
    }

    let nurand_c = cli
        .nurand_c
        .unwrap_or_else(|| rand::rng().random_range(0..256));
    let exe = cli.exe.unwrap_or_else(ProcessBackend::default_exe_path);

    let config = RunConfig {
        output: output.clone(),
        warehouses,
        nurand_c,
        templates: cli.templates,
        schema_name: cli.schema_name.clone(),
        jobs: cli.jobs,
    };
    let driver = Driver::new(config);

    if cli.dry_run {
        let jobs = driver.plan()?;
        print_plan(&jobs, &output, &cli.schema_name, warehouses, nurand_c, cli.json);
        return Ok(());
    }

    // Resolve the full plan up front so the JSON report can include it
    // after the run.
    let jobs = driver.plan()?;

    if !cli.json {
        println!(
            "Generating TPC-C dump: {} warehouses (schema {}, nurand C = {})",
            warehouses, cli.schema_name, nurand_c
        );
        println!("Backend: {}", exe.display());
        println!("Output directory: {}\n", output.display());
    }

    let start_time = Instant::now();
    let mut backend = ProcessBackend::new(exe);

    let (driver, spinner) = if cli.json {
        (driver, None)
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let pb_clone = pb.clone();
        let driver = driver.with_progress(move |idx, total, job| {
            pb_clone.println(format!(
                "[{}/{}] {}: {}",
                idx,
                total,
                job.template,
                describe(job)
            ));
            pb_clone.set_message(format!("generating {}", job.template));
        });
        (driver, Some(pb))
    };

    let result = driver.run(&mut backend);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let stats = result?;
    let elapsed = start_time.elapsed();

    if cli.json {
        let output_json = RunJsonOutput {
            output_dir: output.display().to_string(),
            schema_name: cli.schema_name,
            warehouses,
            nurand_c,
            dry_run: false,
            tables: jobs.iter().map(TableJsonOutput::from_job).collect(),
            statistics: Some(RunJsonStatistics {
                tables_generated: stats.tables_generated,
                files_written: stats.files_written,
                rows_generated: stats.rows_generated,
                elapsed_secs: elapsed.as_secs_f64(),
                schema_file: stats.schema_file.display().to_string(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    } else {
        println!("\n✓ Generation completed successfully!");
        println!("\nStatistics:");
        println!("  Tables generated: {}", stats.tables_generated);
        println!("  Files written: {}", stats.files_written);
        println!("  Rows generated: {}", stats.rows_generated);
        println!("  Schema file: {}", stats.schema_file.display());
        println!("  Elapsed time: {:.3?}", elapsed);
    }

    Ok(())
}

fn print_plan(
    jobs: &[GenerationJob],
    output: &std::path::Path,
    schema_name: &str,
    warehouses: u64,
    nurand_c: u32,
    json: bool,
) {
    if json {
        let output_json = RunJsonOutput {
            output_dir: output.display().to_string(),
            schema_name: schema_name.to_string(),
            warehouses,
            nurand_c,
            dry_run: true,
            tables: jobs.iter().map(TableJsonOutput::from_job).collect(),
            statistics: None,
        };
        match serde_json::to_string_pretty(&output_json) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{}", e),
        }
        return;
    }

    println!(
        "Dry run: plan for {} warehouses (schema {}, nurand C = {})\n",
        warehouses, schema_name, nurand_c
    );
    let total = jobs.len();
    for (idx, job) in jobs.iter().enumerate() {
        println!(
            "[{}/{}] {:<12} {}",
            idx + 1,
            total,
            job.template,
            describe(job)
        );
        if let Some(ref init) = job.initializer {
            println!("      {:<12} initialize: {}", "", init);
        }
    }
    let files: u64 = jobs.iter().map(|j| j.params.files).sum();
    let rows: u64 = jobs.iter().map(|j| j.params.total_rows()).sum();
    println!("\nTotal: {} files, {} rows", files, rows);
}

fn describe(job: &GenerationJob) -> String {
    let p = &job.params;
    let mut desc = format!(
        "{} file{} x {} insert{} x {} rows",
        p.files,
        if p.files == 1 { "" } else { "s" },
        p.inserts,
        if p.inserts == 1 { "" } else { "s" },
        p.rows
    );
    if let Some(n) = p.last_inserts {
        desc.push_str(&format!(" (last file: {} inserts)", n));
    }
    if let Some(n) = p.last_rows {
        desc.push_str(&format!(" (last insert: {} rows)", n));
    }
    desc
}
