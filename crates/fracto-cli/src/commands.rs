//! Non-interactive subcommands. Each writes plain text (or JSON) to `out`.

use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use fracto_core::{
  ItemId, ItemType,
  rates::{self, ROLE_RATES, RoleRates, WORKING_WEEKS},
  store::TagStore,
};
use fracto_sync::ProfileSync;

// ─── Profile ──────────────────────────────────────────────────────────────────

/// Every section and its items, or with `facts` one plain sentence per item.
pub async fn list<S: TagStore>(
  sync: &ProfileSync<S>,
  facts: bool,
  out: &mut impl Write,
) -> Result<()> {
  sync.refresh().await.context("loading profile")?;

  if facts {
    for item_type in ItemType::ALL {
      for item in sync.items_of(item_type) {
        writeln!(out, "{}", item_type.fact_sentence(&item.value, &item.metadata))?;
      }
    }
    return Ok(());
  }

  for item_type in ItemType::ALL {
    let spec = item_type.spec();
    let suffix = if item_type.is_single() { " (one only)" } else { "" };
    writeln!(out, "{}{suffix}", spec.label)?;

    let items = sync.items_of(item_type);
    if items.is_empty() {
      writeln!(out, "  Not set yet")?;
    }
    for item in items {
      let mark = if item.confirmed { " ✓" } else { "" };
      let id = item.id.map(|id| id.to_string()).unwrap_or_default();
      writeln!(out, "  {}{mark}  {id}", item.display_value())?;
    }
  }
  Ok(())
}

pub async fn add<S: TagStore>(
  sync: &ProfileSync<S>,
  item_type: ItemType,
  value: &str,
  out: &mut impl Write,
) -> Result<()> {
  sync.refresh().await.context("loading profile")?;
  let item = sync.add(item_type, value).await?;
  writeln!(out, "Added {} {}", item_type.spec().label, item.display_value())?;
  Ok(())
}

pub async fn edit<S: TagStore>(
  sync: &ProfileSync<S>,
  item_id: ItemId,
  value: &str,
  out: &mut impl Write,
) -> Result<()> {
  sync.refresh().await.context("loading profile")?;
  let item = sync
    .items()
    .into_iter()
    .find(|i| i.id == Some(item_id))
    .ok_or_else(|| anyhow!("no profile item with id {item_id}"))?;

  let edited = sync.edit(&item, value).await?;
  writeln!(out, "Changed {} to {}", item.value, edited.display_value())?;
  Ok(())
}

pub async fn delete<S: TagStore>(
  sync: &ProfileSync<S>,
  item_id: ItemId,
  out: &mut impl Write,
) -> Result<()> {
  sync.refresh().await.context("loading profile")?;
  sync.delete(item_id).await?;
  writeln!(out, "Deleted {item_id}")?;
  Ok(())
}

pub async fn graph<S: TagStore>(
  sync: &ProfileSync<S>,
  user_name: Option<&str>,
  json: bool,
  out: &mut impl Write,
) -> Result<()> {
  sync.refresh().await.context("loading profile")?;
  let graph = sync.graph(user_name);

  if json {
    serde_json::to_writer_pretty(&mut *out, &graph)?;
    writeln!(out)?;
    return Ok(());
  }

  let Some((centre, tags)) = graph.nodes.split_first() else {
    return Ok(());
  };
  writeln!(out, "{}", centre.name)?;
  for (i, node) in tags.iter().enumerate() {
    let branch = if i + 1 == tags.len() { "└─" } else { "├─" };
    let kind = serde_json::to_value(node.kind)?;
    writeln!(out, "{branch} [{}] {}", kind.as_str().unwrap_or_default(), node.name)?;
  }
  Ok(())
}

// ─── Rates ────────────────────────────────────────────────────────────────────

/// Whole pounds with thousands separators, e.g. `£145,000`.
fn money(amount: f64) -> String {
  let whole = amount.round() as i64;
  let digits = whole.unsigned_abs().to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }
  let sign = if whole < 0 { "-" } else { "" };
  format!("{sign}£{grouped}")
}

pub fn rates(role: &str, days: f64, clients: u32, out: &mut impl Write) -> Result<()> {
  let Some(r) = RoleRates::lookup(role) else {
    let known: Vec<_> = ROLE_RATES.iter().map(|r| r.code).collect();
    bail!("unknown role {role:?}; expected one of {}", known.join(", "));
  };
  if !(days > 0.0 && days <= 5.0) {
    bail!("--days must be between 0 and 5, got {days}");
  }

  let day_rate = f64::from(r.avg_day_rate);
  writeln!(
    out,
    "Fractional {}: {}/day (range {} to {})",
    r.label,
    money(day_rate),
    money(r.min_day_rate.into()),
    money(r.max_day_rate.into()),
  )?;

  let earn = rates::candidate_earnings(day_rate, days, clients);
  writeln!(out, "\nEarnings at {days} days/week for {clients} client(s)")?;
  writeln!(out, "  weekly   {}", money(earn.weekly))?;
  writeln!(out, "  monthly  {}", money(earn.monthly))?;
  writeln!(out, "  annual   {}", money(earn.annual))?;

  let save = rates::employer_savings(r.avg_salary.into(), day_rate, days * 8.0);
  writeln!(out, "\nEmployer cost at {days} days/week")?;
  writeln!(out, "  full-time   {}", money(save.full_time_cost))?;
  writeln!(out, "  fractional  {}", money(save.fractional_cost))?;
  writeln!(out, "  saving      {} ({}%)", money(save.savings), save.savings_percent)?;

  let ir35 = rates::ir35_comparison(day_rate, days, WORKING_WEEKS);
  writeln!(out, "\nIR35 take-home on {} gross", money(ir35.inside.gross))?;
  writeln!(
    out,
    "  inside (umbrella)   {}  ({:.1}% deductions)",
    money(ir35.inside.take_home),
    ir35.inside.effective_rate,
  )?;
  writeln!(
    out,
    "  outside (limited)   {}  ({:.1}% deductions)",
    money(ir35.outside.take_home),
    ir35.outside.effective_rate,
  )?;
  writeln!(out, "  difference          {}", money(ir35.difference))?;
  Ok(())
}
