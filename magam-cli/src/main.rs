use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use magam_core::{
    AlertKind, AssignmentRecord, ChecklistItem, EventType, Extractor, PriorityLevel, UNKNOWN,
    WarningLevel, analyze_assignment, completed_count, days_until, deadline_alerts,
    finalize_with_pin, format_date_korean, parse_deadline_date, track_progress,
};
use magam_store::{ChecklistStore, EventStore};
use std::fs;
use std::path::{Path, PathBuf};

mod calendar;
mod config;
mod export;
mod llm;
mod logger;
mod state;

#[derive(Parser, Debug)]
#[command(name = "magam", version, about = "Academic deadline tracking CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a record; difficulty, hours and priority are derived on the way in
    Add {
        #[arg(long)]
        title: String,

        /// Event type (assignment/exam/lecture/meeting/academic/personal)
        #[arg(long, default_value = "assignment")]
        kind: EventType,

        /// Deadline date, YYYY-MM-DD or a Korean form like "12월 25일"
        #[arg(long)]
        date: String,

        /// Window start, HH:MM (default 09:00; end follows one hour later)
        #[arg(long)]
        time: Option<String>,

        /// Window end, HH:MM
        #[arg(long)]
        end_time: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Pin the priority label (high/medium/low) instead of deriving it
        #[arg(long)]
        priority: Option<PriorityLevel>,
    },

    /// Records for one day (default: today) with their live progress
    List {
        /// Day to list, YYYY-MM-DD or a Korean form
        #[arg(long)]
        date: Option<String>,

        /// Every record instead, sorted by date
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// One record with its checklist and progress report
    Show {
        #[arg(long)]
        id: String,
    },

    /// Edit fields in place; derived fields are recomputed
    Edit {
        #[arg(long)]
        id: String,

        #[command(flatten)]
        fields: FieldFlags,
    },

    /// Delete a record together with its checklist
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Extract assignment fields from notice text
    Extract {
        /// Notice text; omit to read --file or stdin
        text: Option<String>,

        #[arg(long)]
        file: Option<PathBuf>,

        /// Accept the extraction into a record with a seeded checklist
        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Run notice text through the configured LLM, then re-extract the reply
    Analyze {
        /// Notice text; omit to read --file or stdin
        text: Option<String>,

        #[arg(long)]
        file: Option<PathBuf>,

        /// Accept the extraction into a record with a seeded checklist
        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Show or toggle a record's checklist
    Check {
        #[arg(long)]
        id: String,

        /// Toggle one step (1-based index)
        #[arg(long)]
        toggle: Option<usize>,
    },

    /// Progress report for one record
    Progress {
        #[arg(long)]
        id: String,
    },

    /// Deadline alerts for records due today or tomorrow
    Remind,

    /// Export all records
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },
}

#[derive(Args, Debug)]
struct FieldFlags {
    #[arg(long)]
    title: Option<String>,

    /// Event type (assignment/exam/lecture/meeting/academic/personal)
    #[arg(long)]
    kind: Option<EventType>,

    /// Deadline date, YYYY-MM-DD or a Korean form
    #[arg(long)]
    date: Option<String>,

    /// Window start, HH:MM
    #[arg(long)]
    time: Option<String>,

    /// Window end, HH:MM
    #[arg(long)]
    end_time: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Pin the priority label; omitted means re-derive
    #[arg(long)]
    priority: Option<PriorityLevel>,
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    /// ICS calendar, deadlines resolved to UTC via the configured timezone
    Ics {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// CSV table
    Csv {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Add {
            title,
            kind,
            date,
            time,
            end_time,
            description,
            priority,
        } => add(title, kind, date, time, end_time, description, priority)?,

        Command::List { date, all } => list(date, all)?,

        Command::Show { id } => show(&id)?,

        Command::Edit { id, fields } => edit(&id, fields)?,

        Command::Delete { id } => delete(&id)?,

        Command::Extract { text, file, save } => {
            let input = read_input(text, file.as_deref())?;
            run_extract(&input, save)?;
        }

        Command::Analyze { text, file, save } => {
            let input = read_input(text, file.as_deref())?;
            analyze(&input, save).await?;
        }

        Command::Check { id, toggle } => check(&id, toggle)?,

        Command::Progress { id } => progress(&id)?,

        Command::Remind => remind()?,

        Command::Export { command } => match command {
            ExportCommand::Ics { out } => export_ics(out.as_deref())?,
            ExportCommand::Csv { out } => export_csv(out.as_deref())?,
        },
    }

    Ok(())
}

fn add(
    title: String,
    kind: EventType,
    date: String,
    time: Option<String>,
    end_time: Option<String>,
    description: Option<String>,
    priority: Option<PriorityLevel>,
) -> Result<()> {
    let today = local_today()?;
    let date = parse_date_flag(&date, today)?;

    let mut record = AssignmentRecord::new("", title, kind, date);
    if let Some(t) = time.as_deref() {
        record.start_time = parse_time(t)?;
        record.end_time = record.start_time + Duration::hours(1);
    }
    if let Some(t) = end_time.as_deref() {
        record.end_time = parse_time(t)?;
    }
    if record.end_time < record.start_time {
        bail!(
            "end time {} is before start time {}",
            record.end_time.format("%H:%M"),
            record.start_time.format("%H:%M")
        );
    }
    if let Some(d) = description {
        record.description = d;
    }

    let record = finalize_with_pin(record, Utc::now(), priority);

    let (mut events, mut checklists) = open_stores()?;
    let stored = events.insert(record)?;
    checklists.seed(&stored.id, stored.event_type)?;

    println!("일정이 등록되었습니다.\n");
    print_record(&stored, checklists.get(&stored.id), today);
    Ok(())
}

fn list(date: Option<String>, all: bool) -> Result<()> {
    let (events, checklists) = open_stores()?;
    let today = local_today()?;

    if all {
        let mut records: Vec<&AssignmentRecord> = events.list().iter().collect();
        records.sort_by_key(|r| (r.date, r.start_time));

        if records.is_empty() {
            println!("등록된 일정이 없습니다.");
            return Ok(());
        }
        println!("전체 {}개의 일정\n", records.len());
        for r in records {
            print_record_line(r, checklists.get(&r.id), today);
        }
        return Ok(());
    }

    let day = match date.as_deref() {
        Some(raw) => parse_date_flag(raw, today)?,
        None => today,
    };

    let day_records = events.events_on(day);
    println!("{}", format_date_korean(day));
    println!("{}개의 과제\n", day_records.len());

    if day_records.is_empty() {
        println!("이 날짜에 등록된 일정이 없습니다.");
        return Ok(());
    }
    for r in day_records {
        print_record_line(r, checklists.get(&r.id), today);
    }
    Ok(())
}

fn show(id: &str) -> Result<()> {
    let (events, checklists) = open_stores()?;
    let today = local_today()?;

    let record = events
        .get(id)
        .with_context(|| format!("no record with id {id}"))?;

    print_record(record, checklists.get(id), today);
    print_checklist(checklists.get(id));
    Ok(())
}

fn edit(id: &str, fields: FieldFlags) -> Result<()> {
    let (mut events, checklists) = open_stores()?;
    let today = local_today()?;

    let mut record = events
        .get(id)
        .with_context(|| format!("no record with id {id}"))?
        .clone();

    if let Some(t) = fields.title {
        record.title = t;
    }
    if let Some(k) = fields.kind {
        record.event_type = k;
    }
    if let Some(raw) = fields.date.as_deref() {
        record.date = parse_date_flag(raw, today)?;
    }
    if let Some(t) = fields.time.as_deref() {
        record.start_time = parse_time(t)?;
    }
    if let Some(t) = fields.end_time.as_deref() {
        record.end_time = parse_time(t)?;
    }
    if record.end_time < record.start_time {
        bail!(
            "end time {} is before start time {}",
            record.end_time.format("%H:%M"),
            record.start_time.format("%H:%M")
        );
    }
    if let Some(d) = fields.description {
        record.description = d;
    }

    let record = finalize_with_pin(record, Utc::now(), fields.priority);

    events.update(record.clone())?;

    println!("일정이 수정되었습니다.\n");
    print_record(&record, checklists.get(id), today);
    Ok(())
}

fn delete(id: &str) -> Result<()> {
    let (mut events, mut checklists) = open_stores()?;

    if magam_store::delete_record(&mut events, &mut checklists, id)? {
        println!("일정이 삭제되었습니다. (id: {id})");
    } else {
        println!("해당 id의 일정이 없습니다: {id}");
    }
    Ok(())
}

/// Extractor pass over notice text: preview the fields, then optionally
/// accept them into a stored record. Shared by `extract` and `analyze`.
fn run_extract(input: &str, save: bool) -> Result<()> {
    let today = local_today()?;
    let extractor = Extractor::new()?;
    let extraction = extractor.extract(input);

    if !extraction.has_any_match() {
        println!("과제 정보를 찾을 수 없습니다.");
        if save {
            bail!("nothing to save: no fields matched");
        }
        return Ok(());
    }

    println!("추출된 과제 정보:");
    println!("  과제 제목: {}", extraction.title.as_str());
    match extraction.deadline.found() {
        Some(raw) => match parse_deadline_date(raw, today) {
            Some(d) => println!("  마감일: {}", format_date_korean(d)),
            None => println!("  마감일: {raw} (날짜 형식을 인식하지 못했습니다)"),
        },
        None => println!("  마감일: {UNKNOWN}"),
    }
    println!("  배점: {}", extraction.points.as_str());
    println!("  제출 장소: {}", extraction.location.as_str());

    if !save {
        return Ok(());
    }

    let mut record = AssignmentRecord::from_extraction("", &extraction, today)?;
    let analysis = analyze_assignment(&record.analysis_text());
    record.difficulty = analysis.difficulty;
    record.estimated_hours = analysis.estimated_hours;

    let (mut events, mut checklists) = open_stores()?;
    let stored = events.insert(record)?;
    checklists.seed(&stored.id, stored.event_type)?;

    println!("\n일정이 캘린더에 저장되었습니다. (id: {})", stored.id);
    Ok(())
}

async fn analyze(input: &str, save: bool) -> Result<()> {
    let cfg = config::load_config()?;

    match llm::analyze_text(&cfg.llm, input).await {
        Ok(reply) if !reply.is_empty() => {
            println!("분석 결과:\n{reply}\n");
            run_extract(&reply, save)
        }
        Ok(_) => {
            println!("빈 응답을 받아 로컬 추출로 대체합니다.");
            run_extract(input, save)
        }
        Err(err) => {
            tracing::warn!("llm analysis failed: {err:#}");
            println!("LLM 분석에 실패하여 로컬 추출로 대체합니다.");
            run_extract(input, save)
        }
    }
}

fn check(id: &str, toggle: Option<usize>) -> Result<()> {
    let (events, mut checklists) = open_stores()?;

    let record = events
        .get(id)
        .with_context(|| format!("no record with id {id}"))?;

    if let Some(n) = toggle {
        if n == 0 {
            bail!("--toggle is 1-based, got 0");
        }
        let completed = checklists.toggle(id, n - 1)?;
        let word = if completed { "완료" } else { "미완료" };
        println!("{n}번 항목을 {word} 상태로 변경했습니다.\n");
    }

    println!("{} {}", record.event_type.icon(), record.title);
    print_checklist(checklists.get(id));
    Ok(())
}

fn progress(id: &str) -> Result<()> {
    let (events, checklists) = open_stores()?;
    let today = local_today()?;

    let record = events
        .get(id)
        .with_context(|| format!("no record with id {id}"))?;

    let report = track_progress(checklists.get(id), record.date, today);
    let days = days_until(record.date, Utc::now());

    println!("{} {}", record.event_type.icon(), record.title);
    if days >= 0 {
        println!("   마감일: {} ({}일 남음)", format_date_korean(record.date), days);
    } else {
        println!("   마감일: {} ({}일 지남)", format_date_korean(record.date), -days);
    }
    println!("   현재 진행률: {:.1}%", report.current_progress);
    println!("   예상 진행률: {:.1}%", report.expected_progress);
    println!(
        "   상태: {}",
        if report.is_delayed { "지연" } else { "정상" }
    );
    if report.warning_level == WarningLevel::High {
        println!("   ⚠️ 진행이 크게 뒤처져 있습니다.");
    }
    Ok(())
}

fn remind() -> Result<()> {
    let (events, _checklists) = open_stores()?;
    let today = local_today()?;

    let alerts = deadline_alerts(events.list(), today);
    if alerts.is_empty() {
        println!("오늘과 내일 마감인 일정이 없습니다.");
        return Ok(());
    }

    if alerts.iter().any(|a| a.kind == AlertKind::DueToday) {
        println!("⚠️ 과제 마감 임박!\n");
    }
    for a in &alerts {
        println!("{}", a.message);
    }
    Ok(())
}

fn export_ics(out: Option<&Path>) -> Result<()> {
    let (events, _checklists) = open_stores()?;
    let cfg = config::load_config()?;

    let calendar_events = calendar::records_to_events(events.list(), &cfg.calendar.timezone)?;
    let ics = calendar::events_to_ics(&calendar_events);

    match out {
        Some(p) => {
            fs::write(p, &ics).with_context(|| format!("write {}", p.display()))?;
            println!("내보내기 완료: {} ({}개 일정)", p.display(), calendar_events.len());
        }
        None => print!("{ics}"),
    }
    Ok(())
}

fn export_csv(out: Option<&Path>) -> Result<()> {
    let (events, _checklists) = open_stores()?;

    match out {
        Some(p) => {
            let f = fs::File::create(p).with_context(|| format!("create {}", p.display()))?;
            export::write_csv(events.list(), f)?;
            println!("내보내기 완료: {} ({}개 일정)", p.display(), events.list().len());
        }
        None => export::write_csv(events.list(), std::io::stdout().lock())?,
    }
    Ok(())
}

fn open_stores() -> Result<(EventStore, ChecklistStore)> {
    let events_path = state::events_path()?;
    let checklists_path = state::checklists_path()?;
    tracing::debug!(
        "stores: {} / {}",
        events_path.display(),
        checklists_path.display()
    );
    Ok((
        EventStore::load(events_path)?,
        ChecklistStore::load(checklists_path)?,
    ))
}

/// Today in the configured timezone. Date-level commands (list, remind,
/// progress) work on the user's calendar day, not the UTC one.
fn local_today() -> Result<NaiveDate> {
    let cfg = config::load_config()?;
    let tz: chrono_tz::Tz = cfg
        .calendar
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("unknown timezone {}: {e}", cfg.calendar.timezone))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

fn parse_date_flag(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    parse_deadline_date(raw, today).with_context(|| format!("unrecognized date: {raw}"))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time: {raw} (expected HH:MM)"))
}

fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(t) = text {
        return Ok(t);
    }
    if let Some(p) = file {
        return fs::read_to_string(p).with_context(|| format!("read {}", p.display()));
    }
    let mut buf = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).context("read stdin")?;
    Ok(buf)
}

fn print_record(record: &AssignmentRecord, items: &[ChecklistItem], today: NaiveDate) {
    println!("{} {}", record.event_type.icon(), record.title);
    println!("   id: {}", record.id);
    println!(
        "   날짜: {} ({} - {})",
        format_date_korean(record.date),
        record.start_time.format("%H:%M"),
        record.end_time.format("%H:%M")
    );

    let mut meta = format!(
        "   유형: {} | 중요도: {}",
        record.event_type.label_ko(),
        record.priority.label_ko()
    );
    if record.event_type == EventType::Assignment {
        meta.push_str(&format!(
            " | 난이도: {} | 예상 소요: {}시간",
            record.difficulty, record.estimated_hours
        ));
    }
    println!("{meta}");

    if !record.description.is_empty() {
        for line in record.description.lines() {
            println!("   {line}");
        }
    }

    let report = track_progress(items, record.date, today);
    println!(
        "   진행률: {:.0}% (예상 {:.0}%) [{}]",
        report.current_progress,
        report.expected_progress,
        if report.is_delayed { "지연" } else { "정상" }
    );
}

fn print_record_line(record: &AssignmentRecord, items: &[ChecklistItem], today: NaiveDate) {
    let report = track_progress(items, record.date, today);

    let mut line = format!(
        "{} [{}] {} | {} {} - {} | 중요도: {}",
        record.event_type.icon(),
        record.event_type.label_ko(),
        record.title,
        record.date,
        record.start_time.format("%H:%M"),
        record.end_time.format("%H:%M"),
        record.priority.label_ko()
    );
    if record.event_type == EventType::Assignment {
        line.push_str(&format!(" | 예상 소요: {}시간", record.estimated_hours));
    }
    println!("{line}");
    println!(
        "   [{}] 진행률 {:.0}% (예상 {:.0}%) | id: {}",
        if report.is_delayed { "지연" } else { "정상" },
        report.current_progress,
        report.expected_progress,
        record.id
    );
}

fn print_checklist(items: &[ChecklistItem]) {
    if items.is_empty() {
        println!("   체크리스트가 없습니다.");
        return;
    }

    println!(
        "   체크리스트 ({}/{} 완료):",
        completed_count(items),
        items.len()
    );
    for (i, item) in items.iter().enumerate() {
        let mark = if item.completed { "x" } else { " " };
        println!("   [{}] {}. {}", mark, i + 1, item.text);
    }
}
