//! Campaign command handlers.

use tabled::Tabled;

use canvass_core::models::Campaign;
use canvass_core::{Console, DeleteFlow, PageRequest};

use crate::cli::{CampaignsArgs, CampaignsCommand, GlobalOpts, ListOpts};
use crate::error::CliError;
use crate::output;

use super::{confirm_destructive, spinner};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CampaignRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Landing Page")]
    landingpage: String,
}

impl From<&Campaign> for CampaignRow {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            status: c.status.clone(),
            start: c.start_date.clone(),
            end: c.end_date.clone(),
            landingpage: c
                .landingpage
                .as_ref()
                .map(|l| l.title.clone())
                .unwrap_or_default(),
        }
    }
}

fn detail(c: &Campaign) -> String {
    let mut lines = vec![
        format!("ID:           {}", c.id),
        format!("Title:        {}", c.title),
        format!("Slug:         {}", c.slug),
        format!("Status:       {}", c.status),
        format!("Start:        {}", c.start_date),
        format!("End:          {}", c.end_date),
    ];
    if !c.description.is_empty() {
        lines.push(format!("Description:  {}", c.description));
    }
    if let Some(ref lp) = c.landingpage {
        lines.push(format!("Landing page: {} ({})", lp.title, lp.id));
    }
    if !c.prospect_filter.is_null() && c.prospect_filter != serde_json::json!({}) {
        let filter = canvass_core::filter::from_api_filter(&c.prospect_filter);
        let pairs: Vec<String> = canvass_core::filter::encode(&filter)
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        lines.push(format!("Filter:       {}", pairs.join(" ")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: CampaignsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CampaignsCommand::List(opts) => list(console, &opts, global).await,

        CampaignsCommand::Get { id } => {
            let campaign = console.get_campaign(&id).await?;
            let out =
                output::render_single(&global.output, &campaign, detail, |c| c.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CampaignsCommand::Delete { id } => delete(console, &id, global).await,
    }
}

async fn list(console: &Console, opts: &ListOpts, global: &GlobalOpts) -> Result<(), CliError> {
    let service = console.campaigns();

    let page = if opts.all {
        let bar = spinner("Fetching all campaign pages...", global.quiet);
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
        |c| CampaignRow::from(c),
        |c| c.id.clone(),
    );
    output::print_output(&out, global.quiet);

    if !global.quiet && !matches!(global.output, crate::cli::OutputFormat::Plain) {
        eprintln!(
            "Page {}/{} -- {} total",
            page.meta.current_page, page.meta.last_page, page.meta.total
        );
    }
    Ok(())
}

async fn delete(console: &Console, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    // Fetch first so the confirmation can name the entity.
    let campaign = console.get_campaign(id).await?;

    confirm_destructive(
        &format!("Delete campaign '{}'? This cannot be undone", campaign.title),
        global.yes,
    )?;

    let service = console.campaigns();
    let mut flow = DeleteFlow::new();
    flow.request(campaign.id.clone(), campaign.title.clone());
    flow.confirm(&service).await?;

    output::print_output(&format!("Deleted campaign '{}'", campaign.title), global.quiet);
    Ok(())
}
