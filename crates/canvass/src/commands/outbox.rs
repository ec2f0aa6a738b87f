//! Email outbox command handlers.

use canvass_core::models::{EmailSendReport, SentEmailStats};
use canvass_core::Console;

use crate::cli::{GlobalOpts, OutboxArgs, OutboxCommand};
use crate::error::CliError;
use crate::output;

use super::confirm_destructive;

fn report_detail(r: &EmailSendReport) -> String {
    let mut lines = Vec::new();
    if !r.message.is_empty() {
        lines.push(r.message.clone());
    }
    lines.push(format!("Emails sent now:      {}", r.emails_sent));
    lines.push(format!("Emails sent total:    {}", r.total_emails_sent));
    lines.push(format!("Notified prospects:   {}", r.notified_prospects));
    lines.push(format!("Available prospects:  {}", r.available_prospects));
    lines.push(format!("Total prospects:      {}", r.total_prospects));
    lines.join("\n")
}

fn stats_detail(s: &SentEmailStats) -> String {
    [
        format!("Emails sent total:    {}", s.total_emails_sent),
        format!("Notified prospects:   {}", s.notified_prospects),
        format!("Available prospects:  {}", s.available_prospects),
        format!("Total prospects:      {}", s.total_prospects),
    ]
    .join("\n")
}

pub async fn handle(
    console: &Console,
    args: OutboxArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OutboxCommand::Send { campaign_id, force } => {
            // Sending mail to every matching prospect is not reversible.
            let campaign = console.get_campaign(&campaign_id).await?;
            let prompt = if force {
                format!(
                    "Send '{}' emails to ALL matching prospects, including ones already notified?",
                    campaign.title
                )
            } else {
                format!("Send '{}' emails to all un-notified matching prospects?", campaign.title)
            };
            confirm_destructive(&prompt, global.yes)?;

            let report = console.send_campaign_emails(&campaign_id, force).await?;
            let out = output::render_single(
                &global.output,
                &report,
                report_detail,
                |r| r.emails_sent.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OutboxCommand::Stats { campaign_id } => {
            let stats = console.sent_email_stats(&campaign_id).await?;
            let out = output::render_single(
                &global.output,
                &stats,
                stats_detail,
                |s| s.total_emails_sent.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
