use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

use schoolsync::config::Config;
use schoolsync::context::{SchoolContext, MINE_VIEW, PENDING_VIEW};
use schoolsync::domain::{
    Choice, ClassFilter, Entity, ExamFilter, FeeAction, FeeFilter, LeaveAction, LeaveFilter,
    StudentFilter, TeacherFilter,
};
use schoolsync::logging::init_tracing;
use schoolsync::service::DomainService;
use schoolsync::sync::{SyncError, SyncStore};

mod cli;

use crate::cli::{Cli, Command, DomainArg};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = SchoolContext::new(&config);

    match cli.command {
        Command::List {
            domain,
            search,
            status,
        } => list(&ctx, domain, search, status.as_deref()).await,
        Command::Show { domain, id } => show(&ctx, domain, &id).await,
        Command::Approve { id, note } => {
            review(&ctx, LeaveAction::Approve { id, note }).await
        }
        Command::Reject { id, reason } => {
            review(&ctx, LeaveAction::Reject { id, reason }).await
        }
        Command::Pay { id, amount } => {
            let fee = ctx
                .fees()
                .mutate(FeeAction::RecordPayment { id, amount })
                .await?;
            print_json(&fee)
        }
        Command::Demo => demo(&ctx).await,
    }
}

async fn list(
    ctx: &SchoolContext,
    domain: DomainArg,
    search: Option<String>,
    status: Option<&str>,
) -> Result<()> {
    match domain {
        DomainArg::Teachers => {
            let filter = TeacherFilter {
                search,
                status: parse_status(status)?,
                ..Default::default()
            };
            fetch_and_print(ctx.teachers(), filter).await
        }
        DomainArg::Classes => {
            if status.is_some() {
                bail!("Classes have no status to filter on");
            }
            let filter = ClassFilter {
                search,
                ..Default::default()
            };
            fetch_and_print(ctx.classes(), filter).await
        }
        DomainArg::Students => {
            let filter = StudentFilter {
                search,
                status: parse_status(status)?,
                ..Default::default()
            };
            fetch_and_print(ctx.students(), filter).await
        }
        DomainArg::Exams => {
            let filter = ExamFilter {
                search,
                status: parse_status(status)?,
                ..Default::default()
            };
            fetch_and_print(ctx.exams(), filter).await
        }
        DomainArg::Fees => {
            let filter = FeeFilter {
                search,
                status: parse_status(status)?,
                ..Default::default()
            };
            fetch_and_print(ctx.fees(), filter).await
        }
        DomainArg::Leaves => {
            let filter = LeaveFilter {
                search,
                status: parse_status(status)?,
                ..Default::default()
            };
            fetch_and_print(ctx.leaves(), filter).await
        }
    }
}

async fn show(ctx: &SchoolContext, domain: DomainArg, id: &str) -> Result<()> {
    match domain {
        DomainArg::Teachers => select_and_print(ctx.teachers(), id).await,
        DomainArg::Classes => select_and_print(ctx.classes(), id).await,
        DomainArg::Students => select_and_print(ctx.students(), id).await,
        DomainArg::Exams => select_and_print(ctx.exams(), id).await,
        DomainArg::Fees => select_and_print(ctx.fees(), id).await,
        DomainArg::Leaves => select_and_print(ctx.leaves(), id).await,
    }
}

/// Approve or reject a leave request with all three leave lists loaded,
/// then print each list's copy of the request.
async fn review(ctx: &SchoolContext, action: LeaveAction) -> Result<()> {
    if !ctx.session().role.can_review_leave() {
        bail!(
            "Role {:?} may not review leave requests",
            ctx.session().role
        );
    }
    let leaves = ctx.leaves();
    leaves.fetch_all().await?;
    leaves.fetch_views().await?;

    let updated = leaves.mutate(action).await?;
    let state = leaves.state();
    let copy_in = |view: &str| state.view(view).and_then(|v| v.get(&updated.id));
    print_json(&json!({
        "updated": updated,
        "all": state.snapshot.iter().find(|l| l.id == updated.id),
        "pending": copy_in(PENDING_VIEW),
        "mine": copy_in(MINE_VIEW),
    }))
}

/// Walk through the store lifecycle: a plain fetch, a three-list leave
/// approval and two back-to-back filter changes.
async fn demo(ctx: &SchoolContext) -> Result<()> {
    let teachers = ctx.teachers();
    let all = teachers
        .fetch_all_with(TeacherFilter {
            status: Some(Choice::All),
            ..Default::default()
        })
        .await?;
    let request = teachers.request();

    let leaves = ctx.leaves();
    leaves.fetch_all().await?;
    leaves.fetch_views().await?;
    leaves.fetch_one("101").await?;
    leaves
        .mutate(LeaveAction::Approve {
            id: "101".to_string(),
            note: Some("Get well soon".to_string()),
        })
        .await?;
    let copies: Vec<_> = leaves
        .state()
        .copies("101")
        .into_iter()
        .map(|l| l.status)
        .collect();

    // The first search is slower, so its response arrives last.
    teachers.service().enqueue_latency(Duration::from_millis(120));
    teachers.service().enqueue_latency(Duration::from_millis(20));
    let (first, second) = tokio::join!(
        teachers.set_filter(TeacherFilter {
            search: Some("sharma".to_string()),
            ..Default::default()
        }),
        teachers.set_filter(TeacherFilter {
            search: Some("sharma j".to_string()),
            ..Default::default()
        }),
    );
    let names: Vec<String> = teachers.snapshot().into_iter().map(|t| t.name).collect();

    print_json(&json!({
        "fetch_all": {
            "count": all.len(),
            "loading": request.loading(),
            "error": request.error,
        },
        "approve_101": {
            "copies": copies,
        },
        "filter_race": {
            "filter": teachers.filter(),
            "first": describe(&first),
            "second": describe(&second),
            "snapshot": names,
        },
    }))
}

fn describe<T>(result: &Result<Vec<T>, SyncError>) -> String {
    match result {
        Ok(items) => format!("applied {} items", items.len()),
        Err(e) => e.to_string(),
    }
}

async fn fetch_and_print<T, S>(store: &SyncStore<T, S>, filter: T::Filter) -> Result<()>
where
    T: Entity,
    S: DomainService<T>,
{
    let items = store.fetch_all_with(filter).await?;
    print_json(&items)
}

async fn select_and_print<T, S>(store: &SyncStore<T, S>, id: &str) -> Result<()>
where
    T: Entity,
    S: DomainService<T>,
{
    match store.fetch_one(id).await? {
        Some(entity) => print_json(&entity),
        None => bail!("No {} with id {}", T::KIND, id),
    }
}

/// Parse a status argument. `all` lifts the restriction; anything else
/// must name a status of the domain, case-insensitively.
fn parse_status<S: DeserializeOwned>(raw: Option<&str>) -> Result<Option<Choice<S>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("all") {
        return Ok(Some(Choice::All));
    }
    let name = raw.trim().to_uppercase().replace('-', "_");
    let status = serde_json::from_value(serde_json::Value::String(name))
        .with_context(|| format!("Unknown status '{}'", raw))?;
    Ok(Some(Choice::Only(status)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
