// Entry point and high-level CLI flow.
//
// - Option [1] loads (or reuses) the folder of monthly exports.
// - Options [2] and [3] set the work-site and period filters.
// - Option [4] builds the five dashboard reports and the JSON summary.
// With `--once` the reports are generated a single time without prompts.
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use efetivo_report::filter::{available_periods, available_sites};
use efetivo_report::output;
use efetivo_report::reports::{generate_summary, Dashboard};
use efetivo_report::util::{format_int, format_optional};
use efetivo_report::{CacheStatus, IngestCache, Ingestion, PipelineConfig, Selection, SiteSelection};

#[derive(Parser)]
#[command(name = "efetivo_report")]
#[command(about = "Workforce headcount and payroll weight reports from monthly spreadsheets")]
struct Args {
    /// Folder with the monthly .xls/.xlsx exports
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// TOML file overriding columns, month names and sentinels
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder the report files are written to
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Work site to filter on ("*" or omitted for every site)
    #[arg(long)]
    site: Option<String>,

    /// Month label to include; repeat for several (default: every month)
    #[arg(long = "period")]
    periods: Vec<String>,

    /// Generate the reports once and exit
    #[arg(long)]
    once: bool,
}

struct App {
    cache: IngestCache,
    dir: PathBuf,
    out: PathBuf,
    ingestion: Option<Arc<Ingestion>>,
    site: SiteSelection,
    periods: Option<Vec<String>>,
}

/// One trimmed line from `input`; `None` at end of input or on a read error.
fn next_line(input: &mut impl BufRead) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    next_line(&mut io::stdin().lock())
}

impl App {
    fn handle_load(&mut self) {
        let (ingestion, status) = self.cache.get_or_ingest(&self.dir);
        if status == CacheStatus::Hit {
            println!("Folder unchanged; reusing loaded data.");
        }
        for warning in &ingestion.warnings {
            println!("Warning: {warning}");
        }
        match ingestion.table() {
            Ok(table) => println!(
                "Processing folder... ({} of {} files loaded, {} rows)\n",
                format_int(ingestion.files_loaded),
                format_int(ingestion.files_found),
                format_int(table.len())
            ),
            Err(e) => println!("Error: {e}\n"),
        }
        self.ingestion = Some(ingestion);
    }

    fn loaded(&mut self) -> Option<Arc<Ingestion>> {
        if self.ingestion.is_none() {
            self.handle_load();
        }
        self.ingestion.clone()
    }

    fn handle_select_site(&mut self) {
        let Some(ingestion) = self.loaded() else { return };
        let Ok(table) = ingestion.table() else {
            println!("Error: no data loaded.\n");
            return;
        };
        let sites = available_sites(table);
        println!("[0] All");
        for (idx, site) in sites.iter().enumerate() {
            println!("[{}] {}", idx + 1, site);
        }
        let Some(choice) = read_line("Enter choice: ") else { return };
        self.site = match choice.parse::<usize>() {
            Ok(0) => SiteSelection::All,
            Ok(n) if n <= sites.len() => SiteSelection::Site(sites[n - 1].clone()),
            _ => {
                println!("Invalid choice; keeping current site.\n");
                return;
            }
        };
        println!();
    }

    fn handle_select_periods(&mut self) {
        let Some(ingestion) = self.loaded() else { return };
        let Ok(table) = ingestion.table() else {
            println!("Error: no data loaded.\n");
            return;
        };
        let periods = available_periods(table);
        for (idx, period) in periods.iter().enumerate() {
            println!("[{}] {}", idx + 1, period.label);
        }
        let Some(choice) = read_line("Enter choices separated by commas (empty for all): ")
        else {
            return;
        };
        if choice.is_empty() {
            self.periods = None;
            println!();
            return;
        }
        let picked: Vec<String> = choice
            .split(',')
            .filter_map(|c| c.trim().parse::<usize>().ok())
            .filter_map(|n| n.checked_sub(1).and_then(|i| periods.get(i)))
            .map(|p| p.label.clone())
            .collect();
        println!("{} period(s) selected.\n", picked.len());
        self.periods = Some(picked);
    }

    fn handle_generate_reports(&mut self) -> Result<()> {
        let Some(ingestion) = self.loaded() else {
            return Ok(());
        };
        let table = match ingestion.table() {
            Ok(table) => table,
            Err(e) => {
                println!("Error: {e}. Nothing to report.\n");
                return Ok(());
            }
        };

        let mut selection = Selection::everything(table).with_site(self.site.clone());
        if let Some(periods) = &self.periods {
            selection = selection.with_periods(periods.iter().cloned());
        }
        let dashboard = Dashboard::build(table, &selection);
        let summary = generate_summary(&ingestion, table, &dashboard);

        println!("Generating reports...");
        let paths = output::export_dashboard(&self.out, &dashboard, &summary)
            .with_context(|| format!("failed to write reports to {}", self.out.display()))?;
        println!("Outputs saved to {}\n", self.out.display());

        println!("Report 1: Monthly Headcount - Direct x Indirect");
        println!("(All periods, not filtered by month)\n");
        output::preview_table_rows(&dashboard.headcount_by_period, 6);
        println!("Report 2: Headcount by Sex\n");
        output::preview_table_rows(&dashboard.headcount_by_sex, 4);
        println!("Report 3: Headcount by Type\n");
        output::preview_table_rows(&dashboard.headcount_by_type, 4);
        println!("Report 4: Production Weight by Site\n");
        output::preview_table_rows(&dashboard.production_weight_by_site, 5);
        println!("Report 5: Overtime Weight by Site\n");
        output::preview_table_rows(&dashboard.overtime_weight_by_site, 5);
        for path in &paths {
            println!("(exported {})", path.display());
        }

        println!("\nSummary Stats ({}):", output::SUMMARY_FILE);
        println!(
            "{{\"filtered_rows\": {}, \"avg_production_weight\": {}, \"avg_overtime_weight\": {}}}\n",
            format_int(summary.filtered_rows),
            format_optional(summary.avg_production_weight, 4),
            format_optional(summary.avg_overtime_weight, 4)
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = PipelineConfig::load(args.config.as_deref()).context("failed to load config")?;
    let dir = args.dir.clone().unwrap_or_else(|| config.input_dir.clone());
    let out = args.out.clone().unwrap_or_else(|| config.output_dir.clone());

    let mut app = App {
        cache: IngestCache::new(config),
        dir,
        out,
        ingestion: None,
        site: args
            .site
            .as_deref()
            .map(SiteSelection::from_arg)
            .unwrap_or_default(),
        periods: (!args.periods.is_empty()).then(|| args.periods.clone()),
    };

    if args.once {
        app.handle_load();
        return app.handle_generate_reports();
    }

    loop {
        println!("Select an option:");
        println!("[1] Load the folder");
        println!("[2] Choose work site");
        println!("[3] Choose periods");
        println!("[4] Generate Reports");
        println!("[0] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            println!();
            break;
        };
        match choice.as_str() {
            "1" => app.handle_load(),
            "2" => app.handle_select_site(),
            "3" => app.handle_select_periods(),
            "4" => {
                println!();
                if let Err(e) = app.handle_generate_reports() {
                    eprintln!("Write error: {e:#}\n");
                }
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-4.\n"),
        }
    }
    Ok(())
}
