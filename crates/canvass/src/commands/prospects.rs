//! Prospect command handlers.
//!
//! Filter flags are applied through the criteria-driven engine, so a flag
//! for a field the server does not declare is silently ignored and the
//! emitted query is always canonical.

use tabled::Tabled;

use canvass_core::filter::{FieldControl, NumericMode};
use canvass_core::models::Prospect;
use canvass_core::{Console, FieldSchema, FilterEngine, FilterValue, PageRequest};

use crate::cli::{FilterOpts, GlobalOpts, ListOpts, ProspectsArgs, ProspectsCommand};
use crate::error::CliError;
use crate::output;

use super::spinner;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProspectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Gender")]
    gender: String,
    #[tabled(rename = "Age")]
    age: u32,
    #[tabled(rename = "Born")]
    born: String,
    #[tabled(rename = "Blood")]
    blood: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Country")]
    country: String,
}

impl From<&Prospect> for ProspectRow {
    fn from(p: &Prospect) -> Self {
        Self {
            id: p.id.clone(),
            gender: p.gender.clone(),
            age: p.age,
            born: p.birth_date.clone(),
            blood: p.blood_group.clone(),
            city: p.address.city.clone(),
            country: p.address.country.clone(),
        }
    }
}

#[derive(Tabled)]
struct CriteriaRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Domain")]
    domain: String,
}

// ── Filter construction ─────────────────────────────────────────────

/// Turn CLI flags into a canonical filter via the engine.
async fn build_filter(console: &Console, opts: &FilterOpts) -> Result<FilterValue, CliError> {
    let schema = console.criteria().await?;
    let mut engine = FilterEngine::new(schema);

    if let Some(exact) = opts.age {
        engine.use_exact_mode("age");
        engine.set_exact("age", Some(exact));
    } else if opts.min_age.is_some() || opts.max_age.is_some() {
        apply_range(&mut engine, "age", opts.min_age, opts.max_age);
    }

    if opts.min_height.is_some() || opts.max_height.is_some() {
        apply_range(&mut engine, "height", opts.min_height, opts.max_height);
    }

    if !opts.gender.is_empty() {
        engine.select_options("gender", opts.gender.clone());
    }
    if !opts.blood_group.is_empty() {
        engine.select_options("blood_group", opts.blood_group.clone());
    }
    if !opts.city.is_empty() {
        engine.select_options("address.city", opts.city.clone());
    }

    if opts.born_after.is_some() || opts.born_before.is_some() {
        engine.set_min_bound("birth_date", opts.born_after.clone());
        engine.set_max_bound("birth_date", opts.born_before.clone());
    }

    Ok(engine.into_value())
}

/// A missing side of the range sits at the domain extreme, which the
/// engine omits as "no constraint".
fn apply_range(engine: &mut FilterEngine, field: &str, low: Option<f64>, high: Option<f64>) {
    let Some(FieldSchema::NumericRange { min, max }) = engine.schema().get(field) else {
        return;
    };
    let (domain_min, domain_max) = (*min, *max);
    engine.set_numeric_range(
        field,
        low.unwrap_or(domain_min),
        high.unwrap_or(domain_max),
    );
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ProspectsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProspectsCommand::List { list, filter } => {
            let value = build_filter(console, &filter).await?;
            run_list(console, &value, &list, global).await
        }

        ProspectsCommand::Count { filter } => count(console, &filter, global).await,

        ProspectsCommand::Criteria => criteria(console, global).await,
    }
}

async fn run_list(
    console: &Console,
    filter: &FilterValue,
    opts: &ListOpts,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let service = console.prospects(filter);

    let page = if opts.all {
        let bar = spinner("Fetching all prospect pages...", global.quiet);
        let page = service.load_all(opts.per_page).await;
        bar.finish_and_clear();
        page?
    } else {
        service
            .load(PageRequest::new(opts.page, opts.per_page))
            .await?
    };

    let out = output::render_list(
        &global.output,
        &page.data,
        |p| ProspectRow::from(p),
        |p| p.id.clone(),
    );
    output::print_output(&out, global.quiet);

    if !global.quiet && !matches!(global.output, crate::cli::OutputFormat::Plain) {
        eprintln!("{} matching prospects", page.meta.total);
    }
    Ok(())
}

async fn count(
    console: &Console,
    opts: &FilterOpts,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // An empty filter never issues a count request; the readout is
    // simply unknown.
    if opts.is_empty() {
        output::print_output("unknown (no filter set)", global.quiet);
        return Ok(());
    }

    let value = build_filter(console, opts).await?;
    if value.is_empty() {
        output::print_output("unknown (no filter set)", global.quiet);
        return Ok(());
    }

    let total = console.count_prospects(&value).await?;
    output::print_output(&total.to_string(), global.quiet);
    Ok(())
}

async fn criteria(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let schema = console.criteria().await?;
    let engine = FilterEngine::new(schema);
    let controls = engine.controls();

    let rows: Vec<CriteriaRow> = controls.iter().map(criteria_row).collect();

    let out = match global.output {
        crate::cli::OutputFormat::Table => {
            use tabled::settings::Style;
            tabled::Table::new(&rows).with(Style::rounded()).to_string()
        }
        _ => {
            // Structured formats get the raw field names, one per line.
            controls
                .iter()
                .map(|c| c.field().to_owned())
                .collect::<Vec<_>>()
                .join("\n")
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

fn criteria_row(control: &FieldControl) -> CriteriaRow {
    match control {
        FieldControl::MultiSelect {
            field,
            label,
            options,
            ..
        } => CriteriaRow {
            field: field.clone(),
            label: label.clone(),
            kind: "options".into(),
            domain: options.join(", "),
        },
        FieldControl::NumericRange {
            field,
            label,
            domain_min,
            domain_max,
            step,
            mode,
        } => CriteriaRow {
            field: field.clone(),
            label: label.clone(),
            kind: match mode {
                NumericMode::Range { .. } => "numeric range".into(),
                NumericMode::Exact { .. } => "numeric exact".into(),
            },
            domain: format!("{domain_min}..{domain_max} (step {step})"),
        },
        FieldControl::DateRange {
            field,
            label,
            domain_min,
            domain_max,
            ..
        } => CriteriaRow {
            field: field.clone(),
            label: label.clone(),
            kind: "date range".into(),
            domain: format!("{domain_min}..{domain_max}"),
        },
        FieldControl::TextRange {
            field,
            label,
            min_hint,
            max_hint,
            ..
        } => CriteriaRow {
            field: field.clone(),
            label: label.clone(),
            kind: "string range".into(),
            domain: format!("{min_hint}..{max_hint}"),
        },
    }
}
