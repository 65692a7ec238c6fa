//! Terminal rendering for calls, agent settings and knowledge base files

use callboard::domain::format::{
    doctor_display, format_call_time, format_dob, format_phone_number, format_scheduled,
    format_time, highlight_keywords, truncate_text,
};
use callboard::{
    AgentConfig, Call, CallFilter, FileEditor, KnowledgeBaseFile, Outcome, Speaker, Tone,
};
use chrono::{DateTime, TimeZone};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

const REASON_WIDTH: usize = 40;
const PREVIEW_WIDTH: usize = 60;

fn outcome_badge(outcome: &Outcome) -> ColoredString {
    let label = format!("[{}]", outcome.label());
    match outcome.tone() {
        Tone::Success => label.green(),
        Tone::Info => label.blue(),
        Tone::Neutral => label.normal(),
    }
}

fn verification_mark(call: &Call) -> ColoredString {
    if call.is_verified {
        "✓".green()
    } else {
        "?".yellow()
    }
}

/// Filter bar: count plus active filters
pub fn filter_summary(filter: &CallFilter, total: usize) -> String {
    let mut line = format!(
        "{} calls · Status: {} · Date: {}",
        total.to_string().bold(),
        filter.status.label().cyan(),
        filter.date.label().cyan()
    );
    if !filter.search.is_empty() {
        let _ = write!(line, " · Search: \"{}\"", filter.search);
    }
    line
}

/// Call table, one row per call
pub fn call_table<Tz: TimeZone>(calls: &[&Call], now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if calls.is_empty() {
        return format!("{}\n", "No calls found.".dimmed());
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!(
            "{:>6}  {:<9} {:<28} {:<24} {:<14} {}",
            "ID", "Time", "Patient", "Appointment", "Outcome", "Reason"
        )
        .bold()
    );

    for call in calls {
        let local = call.timestamp.with_timezone(&now.timezone());
        let appointment = call
            .appointment_type
            .clone()
            .or_else(|| call.doctor.as_deref().map(doctor_display))
            .unwrap_or_else(|| "-".to_string());
        let attention = if call.needs_attention {
            format!(" {}", "⚠ attention".red())
        } else {
            String::new()
        };

        let _ = writeln!(
            out,
            "{:>6}  {:<9} {} {:<26} {:<24} {:<14} {}{}",
            call.id.to_string().dimmed(),
            format_time(&local),
            verification_mark(call),
            truncate_text(&call.patient_name, 24),
            truncate_text(&appointment, 22),
            outcome_badge(&call.outcome),
            truncate_text(&call.reason, REASON_WIDTH),
            attention
        );
    }

    out
}

/// Detail panel for a single call
pub fn call_detail<Tz: TimeZone>(call: &Call, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "{}", call.patient_name.bold());
    let _ = writeln!(out, "{}", format_call_time(&call.timestamp, now).dimmed());
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", "Patient Information".bold());
    let _ = writeln!(out, "  Phone:     {}", format_phone_number(&call.phone_number));
    let _ = writeln!(
        out,
        "  Verified:  {}",
        if call.is_verified { "Yes".green() } else { "No".yellow() }
    );
    if let Some(dob) = &call.dob {
        let _ = writeln!(out, "  DOB:       {}", format_dob(dob));
    }
    if let Some(kind) = &call.appointment_type {
        let _ = writeln!(out, "  Appointment Type: {}", kind);
    }
    if let Some(doctor) = &call.doctor {
        let _ = writeln!(out, "  Doctor:    {}", doctor_display(doctor));
    }
    if let Some(scheduled) = &call.appointment_date_time {
        let _ = writeln!(out, "  Scheduled: {}", format_scheduled(scheduled, &now.timezone()));
    }
    let _ = writeln!(out, "  Reason:    {}", call.reason);
    let _ = writeln!(out, "  Outcome:   {}  Status: {}", outcome_badge(&call.outcome), call.status);
    if call.needs_attention {
        let _ = writeln!(
            out,
            "  {} {}",
            "Needs attention:".red().bold(),
            call.attention_reason.as_deref().unwrap_or("-")
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", "Call Transcript".bold());
    if call.transcript.is_empty() {
        let _ = writeln!(out, "  {}", "No transcript available for this call.".italic().dimmed());
    }
    for entry in &call.transcript {
        let speaker = match entry.speaker {
            Speaker::AiAssistant => entry.speaker.to_string().cyan(),
            Speaker::Patient => entry.speaker.to_string().normal(),
        };
        let message = highlight_keywords(&entry.message, &entry.keywords, |m| {
            m.yellow().bold().to_string()
        });
        let _ = writeln!(out, "  [{}] {}: {}", entry.timestamp.dimmed(), speaker, message);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", "AI Decision Log".bold());
    if call.ai_decisions.is_empty() {
        let _ = writeln!(out, "  {}", "No AI decisions recorded for this call.".italic().dimmed());
    }
    for decision in &call.ai_decisions {
        let _ = writeln!(out, "  • {}", decision);
    }

    out
}

/// Static panel shown when the call list cannot be loaded
pub fn load_error_panel(error: &dyn std::fmt::Display) -> String {
    format!(
        "{}\n{}\n{}\n",
        "Error Loading Calls".red().bold(),
        "Failed to connect to the call backend. Please check your API configuration.",
        format!("({})", error).dimmed()
    )
}

/// Agent configuration overview
pub fn agent_config(config: &AgentConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", config.name.cyan().bold(), config.agent_id.dimmed());
    let _ = writeln!(out, "  Language:     {}", config.language);
    let _ = writeln!(out, "  Phone Number: {}", format_phone_number(&config.phone_number));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "First Message".bold());
    let _ = writeln!(out, "  {}", config.first_message);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "System Prompt".bold());
    for line in config.system_prompt.lines() {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} ({})",
        "Knowledge Base".bold(),
        config.knowledgebase_files.len()
    );
    out.push_str(&knowledge_base_list(&config.knowledgebase_files));
    out
}

/// Knowledge base file list
pub fn knowledge_base_list(files: &[KnowledgeBaseFile]) -> String {
    if files.is_empty() {
        return format!("  {}\n", "No knowledge base files.".dimmed());
    }

    let mut out = String::new();
    for file in files {
        let _ = writeln!(
            out,
            "  {} {} {}",
            file.file_id.dimmed(),
            file.name.cyan(),
            file.created_at.dimmed()
        );
        if !file.content.is_empty() {
            let preview = truncate_text(&file.content.replace('\n', " "), PREVIEW_WIDTH);
            let _ = writeln!(out, "      {}", preview.dimmed());
        }
    }
    out
}

/// Full file content as opened for editing
pub fn file_content(editor: &FileEditor) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} characters)",
        editor.name.bold(),
        editor.content.chars().count()
    );
    if editor.source == callboard::ContentSource::Preview {
        let _ = writeln!(out, "{}", "Showing preview; full content could not be loaded.".yellow());
    }
    let _ = writeln!(out, "{}", "---".dimmed());
    out.push_str(&editor.content);
    if !editor.content.ends_with('\n') {
        out.push('\n');
    }
    out
}
