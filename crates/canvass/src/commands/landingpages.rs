//! Landing page command handlers.

use tabled::Tabled;

use canvass_core::models::Landingpage;
use canvass_core::{Console, DeleteFlow, PageRequest};

use crate::cli::{GlobalOpts, LandingpagesArgs, LandingpagesCommand, ListOpts};
use crate::error::CliError;
use crate::output;

use super::{confirm_destructive, spinner};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LandingpageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Headline")]
    headline: String,
    #[tabled(rename = "Sections")]
    sections: usize,
    #[tabled(rename = "Campaigns")]
    campaigns: usize,
}

impl From<&Landingpage> for LandingpageRow {
    fn from(lp: &Landingpage) -> Self {
        Self {
            id: lp.id.clone(),
            title: lp.title.clone(),
            headline: lp.headline.clone(),
            sections: lp.sections.len(),
            campaigns: lp.campaigns.len(),
        }
    }
}

fn detail(lp: &Landingpage) -> String {
    let mut lines = vec![
        format!("ID:        {}", lp.id),
        format!("Title:     {}", lp.title),
        format!("Headline:  {}", lp.headline),
        format!("Subline:   {}", lp.subline),
        format!("Sections:  {}", lp.sections.len()),
    ];
    for (i, section) in lp.sections.iter().enumerate() {
        lines.push(format!("  [{}] {} -> {}", i + 1, section.text, section.cta_url));
    }
    if !lp.campaigns.is_empty() {
        lines.push("Used by campaigns:".to_owned());
        for c in &lp.campaigns {
            lines.push(format!("  {} ({})", c.title, c.id));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: LandingpagesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LandingpagesCommand::List(opts) => list(console, &opts, global).await,

        LandingpagesCommand::Get { id } => {
            let page = console.get_landingpage(&id).await?;
            let out = output::render_single(&global.output, &page, detail, |lp| lp.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LandingpagesCommand::Delete { id } => delete(console, &id, global).await,
    }
}

async fn list(console: &Console, opts: &ListOpts, global: &GlobalOpts) -> Result<(), CliError> {
    let service = console.landingpages();

    let page = if opts.all {
        let bar = spinner("Fetching all landing page pages...", global.quiet);
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
        |lp| LandingpageRow::from(lp),
        |lp| lp.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn delete(console: &Console, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let page = console.get_landingpage(id).await?;

    // Campaigns still pointing here would dangle; surface that in the
    // confirmation prompt.
    let warning = if page.campaigns.is_empty() {
        String::new()
    } else {
        format!(" ({} campaign(s) still reference it)", page.campaigns.len())
    };
    confirm_destructive(
        &format!("Delete landing page '{}'?{warning}", page.title),
        global.yes,
    )?;

    let service = console.landingpages();
    let mut flow = DeleteFlow::new();
    flow.request(page.id.clone(), page.title.clone());
    flow.confirm(&service).await?;

    output::print_output(&format!("Deleted landing page '{}'", page.title), global.quiet);
    Ok(())
}
