//! Sequential orchestration of the row-generation backend.
//!
//! One backend process per table, run to completion in catalog order.
//! The first failure aborts the run; earlier tables' output stays on
//! disk for inspection.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::catalog::{TableParams, TableSpec, CATALOG};
use crate::error::{Error, Result};

/// Run-level configuration shared by every table.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output: PathBuf,
    pub warehouses: u64,
    /// Constant C of the NUrand() function, bound as a session
    /// variable by the config and customer initializers.
    pub nurand_c: u32,
    pub templates: PathBuf,
    pub schema_name: String,
    /// Parallel file-generation jobs inside the backend; the driver
    /// itself never runs tables concurrently.
    pub jobs: Option<usize>,
}

/// One fully resolved backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub template: String,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub schema_name: String,
    pub params: TableParams,
    pub initializer: Option<String>,
    pub jobs: Option<usize>,
}

impl GenerationJob {
    pub fn from_spec(spec: &TableSpec, config: &RunConfig) -> Result<Self> {
        Ok(Self {
            template: spec.template.to_string(),
            template_path: config
                .templates
                .join(spec.template)
                .with_extension("sql"),
            output_dir: config.output.join(spec.template),
            schema_name: config.schema_name.clone(),
            params: spec.resolve(config.warehouses)?,
            initializer: spec.initializer.render(config.warehouses, config.nurand_c),
            jobs: config.jobs,
        })
    }

    /// Backend argv, excluding the executable itself.
    pub fn command_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-k".into(),
            self.params.files.to_string().into(),
            "-n".into(),
            self.params.inserts.to_string().into(),
            "-r".into(),
            self.params.rows.to_string().into(),
            "-i".into(),
            self.template_path.clone().into(),
            "-o".into(),
            self.output_dir.clone().into(),
            "--schema-name".into(),
            self.schema_name.clone().into(),
        ];
        if let Some(jobs) = self.jobs {
            args.push("-j".into());
            args.push(jobs.to_string().into());
        }
        if let Some(ref init) = self.initializer {
            args.push("-D".into());
            args.push(init.clone().into());
        }
        if let Some(n) = self.params.last_inserts {
            args.push("--last-file-inserts-count".into());
            args.push(n.to_string().into());
        }
        if let Some(n) = self.params.last_rows {
            args.push("--last-insert-rows-count".into());
            args.push(n.to_string().into());
        }
        args
    }
}

/// Boundary to the external row generator. One call per table, run to
/// completion before the next table is resolved.
pub trait Backend {
    fn generate(&mut self, job: &GenerationJob) -> Result<()>;
}

/// Shells out to the `dbgen` executable.
pub struct ProcessBackend {
    exe: PathBuf,
}

impl ProcessBackend {
    pub fn new(exe: PathBuf) -> Self {
        Self { exe }
    }

    /// Default executable location: a release build in the working
    /// tree, with the platform's executable suffix.
    pub fn default_exe_path() -> PathBuf {
        PathBuf::from("target/release").join(format!("dbgen{}", std::env::consts::EXE_SUFFIX))
    }
}

impl Backend for ProcessBackend {
    fn generate(&mut self, job: &GenerationJob) -> Result<()> {
        let status = Command::new(&self.exe)
            .args(job.command_args())
            .status()
            .map_err(|e| Error::io(self.exe.clone(), e))?;
        if !status.success() {
            return Err(Error::BackendFailed {
                template: job.template.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Statistics reported after a successful run.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub tables_generated: usize,
    pub files_written: u64,
    pub rows_generated: u64,
    pub schema_file: PathBuf,
}

/// Drives the backend over the table catalog.
pub struct Driver {
    config: RunConfig,
    progress: Option<Box<dyn FnMut(usize, usize, &GenerationJob)>>,
}

impl Driver {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Called with (1-based index, table count, job) before each
    /// backend invocation.
    pub fn with_progress<F: FnMut(usize, usize, &GenerationJob) + 'static>(mut self, f: F) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Resolve every catalog entry without touching the filesystem.
    pub fn plan(&self) -> Result<Vec<GenerationJob>> {
        CATALOG
            .iter()
            .map(|spec| GenerationJob::from_spec(spec, &self.config))
            .collect()
    }

    /// Generate every table in catalog order, then write the
    /// schema-create statement. Aborts on the first failure without
    /// cleaning up already-generated tables.
    pub fn run(mut self, backend: &mut dyn Backend) -> Result<RunStats> {
        let jobs = self.plan()?;

        fs::create_dir_all(&self.config.output)
            .map_err(|e| Error::io(self.config.output.clone(), e))?;

        let total = jobs.len();
        let mut files_written = 0;
        let mut rows_generated = 0;
        for (idx, job) in jobs.iter().enumerate() {
            if !job.template_path.exists() {
                return Err(Error::MissingTemplate(job.template_path.clone()));
            }
            if let Some(ref mut progress) = self.progress {
                progress(idx + 1, total, job);
            }
            backend.generate(job)?;
            files_written += job.params.files;
            rows_generated += job.params.total_rows();
        }

        let schema_file = self.write_schema_create()?;
        Ok(RunStats {
            tables_generated: total,
            files_written,
            rows_generated,
            schema_file,
        })
    }

    /// The `CREATE SCHEMA` bootstrap statement lives next to the
    /// config table's dump, so loading `0_config` first picks it up.
    fn write_schema_create(&self) -> Result<PathBuf> {
        let dir = self.config.output.join(CATALOG[0].template);
        fs::create_dir_all(&dir).map_err(|e| Error::io(dir.clone(), e))?;
        let path = dir.join(format!("{}-schema-create.sql", self.config.schema_name));
        fs::write(
            &path,
            format!("CREATE SCHEMA IF NOT EXISTS {};\n", self.config.schema_name),
        )
        .map_err(|e| Error::io(path.clone(), e))?;
        Ok(path)
    }
}
