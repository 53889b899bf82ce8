use std::env;
use std::time::Instant;

use obst_dp::{utils::approx_eq, OptimalBst};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("obst_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("OBST Scaling Probe: Performance and Correctness Testing");
    eprintln!("{}", "=".repeat(80));
    eprintln!();
    eprintln!("Builds optimal binary search trees for several weight distributions");
    eprintln!("of increasing size and checks:");
    eprintln!("  • Cost identity: C[1][n] equals the depth-weighted probability sum");
    eprintln!("  • Structure: in-order walk reproduces the key order");
    eprintln!(
        "  • Baseline: C[1][n] matches an independent full-table DP (up to {} keys)",
        options.verify_limit
    );
    eprintln!();
    eprintln!("Metrics explained:");
    eprintln!("  • wall_s: Wall-clock time in seconds (lower is better)");
    eprintln!("  • rss_delta_kib: Memory delta in KiB");
    eprintln!("  • status: 'passed' = all checks hold, 'not_checked' = baseline skipped");
    eprintln!();
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut sys = System::new();
    let mut measurements = Vec::new();
    let total = Distribution::ALL.len();

    for (idx, distribution) in Distribution::ALL.iter().enumerate() {
        eprintln!("[{}/{}] {}...", idx + 1, total, distribution.description());
        measurements.extend(run_distribution(*distribution, &options, &mut sys));
        eprintln!();
    }

    print_summary(&measurements, &options);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("obst_probe output error: {err}");
        std::process::exit(1);
    }
}

struct Options {
    format: OutputFormat,
    max_keys: usize,
    verify_limit: usize,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Csv;
        let mut max_keys = 256usize;
        let mut verify_limit = 128usize;

        while let Some(arg) = args.next() {
            let arg = arg.into();
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            } else if let Some(value) = arg.strip_prefix("--format=") {
                format = OutputFormat::from_str(value)?;
            } else if arg == "--format" {
                let value = next_value(&mut args, "--format")?;
                format = OutputFormat::from_str(&value)?;
            } else if let Some(value) = arg.strip_prefix("--max-keys=") {
                max_keys = parse_count(value, "max keys")?;
            } else if arg == "--max-keys" {
                let value = next_value(&mut args, "--max-keys")?;
                max_keys = parse_count(&value, "max keys")?;
            } else if let Some(value) = arg.strip_prefix("--verify-limit=") {
                verify_limit = parse_count(value, "verify limit")?;
            } else if arg == "--verify-limit" {
                let value = next_value(&mut args, "--verify-limit")?;
                verify_limit = parse_count(&value, "verify limit")?;
            } else {
                return Err(format!("unrecognized argument '{arg}'"));
            }
        }

        Ok(Self {
            format,
            max_keys,
            verify_limit,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --bin obst_probe [-- <options>]

Options:
  --format <csv|table|json>     Output format (default: csv)
  --max-keys <N>                Largest key count to build (default: 256)
  --verify-limit <N>            Largest key count checked against the baseline DP (default: 128)
  -h, --help                    Print this help message

Examples:
  cargo run --release --bin obst_probe
  cargo run --release --bin obst_probe -- --format table --max-keys 512
"
        );
    }
}

fn next_value<I, T>(args: &mut I, flag: &str) -> Result<String, String>
where
    I: Iterator<Item = T>,
    T: Into<String>,
{
    args.next()
        .map(Into::into)
        .ok_or_else(|| format!("missing value after {flag}"))
}

fn parse_count(value: &str, what: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("{what} must be a non-negative integer"))
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

#[derive(Copy, Clone)]
enum Distribution {
    Uniform,
    Zipf,
    Geometric,
    Gapped,
}

impl Distribution {
    const ALL: [Distribution; 4] = [
        Distribution::Uniform,
        Distribution::Zipf,
        Distribution::Geometric,
        Distribution::Gapped,
    ];

    fn label(self) -> &'static str {
        match self {
            Distribution::Uniform => "uniform",
            Distribution::Zipf => "zipf",
            Distribution::Geometric => "geometric",
            Distribution::Gapped => "gapped",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Distribution::Uniform => "Uniform key weights (tie-heavy, balanced optimum)",
            Distribution::Zipf => "Zipf key weights 1/i",
            Distribution::Geometric => "Geometric key weights 2^-i (chain-shaped optimum)",
            Distribution::Gapped => "Periodic key and gap weights",
        }
    }

    fn weights(self, n: usize) -> (Vec<f64>, Option<Vec<f64>>) {
        match self {
            Distribution::Uniform => (vec![1.0 / n.max(1) as f64; n], None),
            Distribution::Zipf => ((1..=n).map(|i| 1.0 / i as f64).collect(), None),
            Distribution::Geometric => ((1..=n).map(|i| 0.5f64.powi(i as i32)).collect(), None),
            Distribution::Gapped => {
                let keys = (0..n).map(|i| ((i * 7) % 11 + 1) as f64).collect();
                let gaps = (0..=n).map(|i| ((i * 3) % 5) as f64 * 0.5).collect();
                (keys, Some(gaps))
            }
        }
    }
}

#[derive(Clone)]
struct Measurement {
    scenario: &'static str,
    size_desc: String,
    wall_s: f64,
    rss_delta_kib: u64,
    height: usize,
    cost: f64,
    verification_status: VerificationStatus,
    verification_detail: Option<String>,
}

#[derive(Clone, Copy)]
enum VerificationStatus {
    NotChecked,
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotChecked => "not_checked",
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }
}

fn run_distribution(
    distribution: Distribution,
    options: &Options,
    sys: &mut System,
) -> Vec<Measurement> {
    const SIZES: &[usize] = &[16, 32, 64, 128, 256, 512, 1024];
    let sizes: Vec<usize> = SIZES
        .iter()
        .copied()
        .filter(|&n| n <= options.max_keys)
        .collect();
    let total = sizes.len();

    sizes
        .iter()
        .enumerate()
        .map(|(idx, &n)| {
            eprint!("      [{}/{}] Testing {} keys... ", idx + 1, total, n);
            let (key_probs, gap_probs) = distribution.weights(n);
            let keys: Vec<usize> = (0..n).collect();

            let before = rss_kib(sys);
            let start = Instant::now();
            let built = OptimalBst::new(keys, key_probs.clone(), gap_probs.clone());
            let wall_s = start.elapsed().as_secs_f64();
            let rss_delta_kib = rss_kib(sys).saturating_sub(before);

            let m = match built {
                Ok(tree) => {
                    let (status, detail) =
                        verify(&tree, &key_probs, gap_probs.as_deref(), options.verify_limit);
                    Measurement {
                        scenario: distribution.label(),
                        size_desc: format!("n={n}"),
                        wall_s,
                        rss_delta_kib,
                        height: tree.height(),
                        cost: tree.total_cost(),
                        verification_status: status,
                        verification_detail: detail,
                    }
                }
                Err(err) => Measurement {
                    scenario: distribution.label(),
                    size_desc: format!("n={n}"),
                    wall_s,
                    rss_delta_kib,
                    height: 0,
                    cost: 0.0,
                    verification_status: VerificationStatus::Failed,
                    verification_detail: Some(err.to_string()),
                },
            };

            let status_icon = match m.verification_status {
                VerificationStatus::Passed => "✓",
                VerificationStatus::Failed => "✗",
                VerificationStatus::NotChecked => "○",
            };
            eprintln!(
                "{} cost={:.6}, height={}, time={:.3}s, status={}",
                status_icon,
                m.cost,
                m.height,
                m.wall_s,
                m.verification_status.label()
            );
            m
        })
        .collect()
}

fn verify(
    tree: &OptimalBst<usize>,
    key_probs: &[f64],
    gap_probs: Option<&[f64]>,
    verify_limit: usize,
) -> (VerificationStatus, Option<String>) {
    let n = tree.len();
    let zeros = vec![0.0; n + 1];
    let gaps = gap_probs.unwrap_or(&zeros);

    let by_depth: f64 = (0..n)
        .filter_map(|pos| tree.depth(Some(&pos)).map(|d| (d + 1) as f64 * key_probs[pos]))
        .sum::<f64>()
        + (0..=n)
            .filter_map(|g| tree.gap_depth(g).map(|d| (d + 1) as f64 * gaps[g]))
            .sum::<f64>();
    if !approx_eq(by_depth, tree.total_cost()) {
        return (
            VerificationStatus::Failed,
            Some(format!(
                "cost identity: table {} vs depth-weighted {by_depth}",
                tree.total_cost()
            )),
        );
    }

    if !tree.in_order().eq(tree.iter()) {
        return (
            VerificationStatus::Failed,
            Some("in-order walk does not reproduce key order".to_string()),
        );
    }

    if n > verify_limit {
        return (VerificationStatus::NotChecked, None);
    }
    let baseline = full_obst_cost(key_probs, gaps);
    if approx_eq(baseline, tree.total_cost()) {
        (VerificationStatus::Passed, None)
    } else {
        (
            VerificationStatus::Failed,
            Some(format!("expected {baseline}, got {}", tree.total_cost())),
        )
    }
}

fn print_summary(measurements: &[Measurement], options: &Options) {
    eprintln!("\n{}", "=".repeat(80));
    eprintln!("Test Summary");
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut passed = 0;
    let mut failed = 0;
    let mut not_checked = 0;
    for m in measurements {
        match m.verification_status {
            VerificationStatus::Passed => passed += 1,
            VerificationStatus::Failed => failed += 1,
            VerificationStatus::NotChecked => not_checked += 1,
        }
    }

    let total = measurements.len().max(1);
    eprintln!("Verification Results:");
    eprintln!("  Total tests: {}", measurements.len());
    eprintln!("  ✓ Passed: {} ({:.1}%)", passed, 100.0 * passed as f64 / total as f64);
    eprintln!("  ✗ Failed: {} ({:.1}%)", failed, 100.0 * failed as f64 / total as f64);
    eprintln!(
        "  ○ Not checked (n > {}): {} ({:.1}%)",
        options.verify_limit,
        not_checked,
        100.0 * not_checked as f64 / total as f64
    );
    eprintln!();

    if failed > 0 {
        eprintln!("Failed Tests:");
        for m in measurements {
            if matches!(m.verification_status, VerificationStatus::Failed) {
                eprintln!("  ✗ {} ({})", m.scenario, m.size_desc);
                if let Some(ref detail) = m.verification_detail {
                    eprintln!("     Error: {}", detail);
                }
            }
        }
        eprintln!();
    }

    eprintln!("Performance Statistics by Scenario:");
    eprintln!();
    for distribution in Distribution::ALL {
        let ms: Vec<&Measurement> = measurements
            .iter()
            .filter(|m| m.scenario == distribution.label())
            .collect();
        let (Some(first), Some(last)) = (ms.first(), ms.last()) else {
            continue;
        };
        let max_time = ms.iter().map(|m| m.wall_s).fold(0.0, f64::max);
        let max_mem = ms.iter().map(|m| m.rss_delta_kib).max().unwrap_or(0);

        eprintln!("  {}:", distribution.label());
        eprintln!("    Tests: {}", ms.len());
        eprintln!("    Time: max={:.3}s", max_time);
        eprintln!("    Memory: max_delta={} KiB", max_mem);
        eprintln!("    Height: {} ({}) -> {} ({})", first.height, first.size_desc, last.height, last.size_desc);
        if ms.len() >= 2 && first.wall_s > 0.0 {
            eprintln!(
                "    Scaling: {:.1}x slower from smallest to largest",
                last.wall_s / first.wall_s
            );
        }
        eprintln!();
    }

    eprintln!("{}", "=".repeat(80));
    if failed == 0 {
        eprintln!("✓ All verified builds passed.");
    } else {
        eprintln!("✗ {} build(s) failed. Please review the errors above.", failed);
    }
    eprintln!();
    eprintln!("Interpretation:");
    eprintln!("  • Build time should grow roughly 8x per doubling of n (cubic DP)");
    eprintln!("  • Memory grows with the three (n+2)x(n+1) tables");
    eprintln!("{}", "=".repeat(80));
    eprintln!();
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("scenario,size_desc,wall_s,rss_delta_kib,height,cost,verification_status,verification_detail");
    for m in measurements {
        let detail = m
            .verification_detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{:.3},{},{},{:.6},{},\"{}\"",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.height,
            m.cost,
            m.verification_status.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    let mut col1 = "scenario".len();
    let mut col2 = "size".len();
    for m in measurements {
        col1 = col1.max(m.scenario.len());
        col2 = col2.max(m.size_desc.len());
    }

    println!(
        "{:<col1$}  {:<col2$}  {:>10}  {:>14}  {:>7}  {:>14}  {:>12}  {}",
        "scenario", "size", "wall_s", "rss_delta_kib", "height", "cost", "status", "detail",
    );
    println!(
        "{:-<col1$}  {:-<col2$}  {:-<10}  {:-<14}  {:-<7}  {:-<14}  {:-<12}  {:-<12}",
        "", "", "", "", "", "", "", "",
    );
    for m in measurements {
        println!(
            "{:<col1$}  {:<col2$}  {:>10.3}  {:>14}  {:>7}  {:>14.6}  {:>12}  {}",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.height,
            m.cost,
            m.verification_status.label(),
            m.verification_detail.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    println!("[");
    for (idx, m) in measurements.iter().enumerate() {
        let detail = m.verification_detail.as_ref().map(|s| s.replace('"', "'"));
        println!(
            "  {{\"scenario\":\"{}\",\"size\":\"{}\",\"wall_s\":{:.3},\"rss_delta_kib\":{},\"height\":{},\"cost\":{:.6},\"verification\":{{\"status\":\"{}\",\"detail\":{}}}}}{}",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.height,
            m.cost,
            m.verification_status.label(),
            match detail {
                Some(ref d) => format!("\"{d}\""),
                None => "null".to_string(),
            },
            if idx + 1 == measurements.len() { "" } else { "," }
        );
    }
    println!("]");
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    if let Some(process) = get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        process.memory() / 1024
    } else {
        0
    }
}

/// Plain nested-vector OBST cost, independent of the crate's flat tables.
fn full_obst_cost(p: &[f64], q: &[f64]) -> f64 {
    let n = p.len();
    let mut w = vec![vec![0.0f64; n + 1]; n + 2];
    let mut e = vec![vec![0.0f64; n + 1]; n + 2];
    for i in 1..=n + 1 {
        w[i][i - 1] = q[i - 1];
        e[i][i - 1] = q[i - 1];
    }
    for len in 1..=n {
        for i in 1..=n - len + 1 {
            let j = i + len - 1;
            w[i][j] = w[i][j - 1] + p[j - 1] + q[j];
            e[i][j] = f64::INFINITY;
            for r in i..=j {
                let t = e[i][r - 1] + e[r + 1][j] + w[i][j];
                if t < e[i][j] {
                    e[i][j] = t;
                }
            }
        }
    }
    if n == 0 {
        0.0
    } else {
        e[1][n]
    }
}
