#![warn(clippy::uninlined_format_args)]

//! Script interpreter for the divvy ledger. One command per line:
//!
//! ```text
//! add alice
//! add bob
//! pay alice bob=584
//! spend alice
//! balances
//! settle
//! remove bob
//! ```
//!
//! Amounts are minor currency units. Lines starting with `#` are comments.

use std::{borrow::Cow, collections::HashMap, env, fs, process};

use divvy_domain::{Money, ParticipantId};
use divvy_infrastructure::UuidIdSource;
use divvy_ledger::{LedgerService, PaymentLine};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: divvy <file.divvy>".into());
    };

    let source =
        fs::read_to_string(&path).map_err(|err| format!("Failed to read '{path}': {err}"))?;

    let ids = UuidIdSource;
    let mut service = LedgerService::new(&ids);
    let mut session = Session::default();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        session.execute(&mut service, line, line_no)?;
    }

    Ok(())
}

/// Maps script names to generated participant ids and back for printing.
#[derive(Default)]
struct Session {
    ids_by_name: HashMap<String, ParticipantId>,
    names_by_id: HashMap<ParticipantId, String>,
}

impl Session {
    fn execute(
        &mut self,
        service: &mut LedgerService<'_>,
        line: &str,
        line_no: usize,
    ) -> CliResult<()> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Ok(());
        };

        match command {
            "add" => {
                let name = expect_arg(parts.next(), "add NAME", line_no)?;
                if self.ids_by_name.contains_key(name) {
                    return Err(format!("Line {line_no}: '{name}' already added").into());
                }
                let id = service.add_participant();
                self.ids_by_name.insert(name.to_string(), id.clone());
                self.names_by_id.insert(id, name.to_string());
            }
            "remove" => {
                let name = expect_arg(parts.next(), "remove NAME", line_no)?;
                let id = self.resolve(name, line_no)?;
                service
                    .remove_participant(&id)
                    .map_err(|err| format!("Line {line_no}: {err}"))?;
                self.ids_by_name.remove(name);
                self.names_by_id.remove(&id);
            }
            "pay" => {
                let payer_name = expect_arg(parts.next(), "pay PAYER NAME=AMOUNT...", line_no)?;
                let payer = self.resolve(payer_name, line_no)?;
                let mut lines = Vec::new();
                for item in parts {
                    lines.push(self.parse_line_item(item, line_no)?);
                }
                if lines.is_empty() {
                    return Err(format!("Line {line_no}: 'pay' needs at least one NAME=AMOUNT").into());
                }
                service
                    .record_payment_set(&payer, lines)
                    .map_err(|err| format!("Line {line_no}: {err}"))?;
            }
            "spend" => {
                let name = expect_arg(parts.next(), "spend NAME", line_no)?;
                let id = self.resolve(name, line_no)?;
                let total = service
                    .total_spend(&id)
                    .map_err(|err| format!("Line {line_no}: {err}"))?;
                println!("{name} spent {total}");
            }
            "balances" => {
                for debt in service.list_all_total_debts() {
                    let name = self.display_name(&debt.person);
                    println!("{name} {}", debt.amount);
                }
            }
            "settle" => {
                let payments = service.suggested_payments();
                if payments.is_empty() {
                    println!("all settled");
                }
                for payment in payments {
                    let from = self.display_name(&payment.from);
                    let to = self.display_name(&payment.to);
                    println!("{from} -> {to}: {}", payment.amount);
                }
            }
            other => {
                return Err(format!("Line {line_no}: unknown command '{other}'").into());
            }
        }

        Ok(())
    }

    fn resolve(&self, name: &str, line_no: usize) -> CliResult<ParticipantId> {
        self.ids_by_name
            .get(name)
            .cloned()
            .ok_or_else(|| format!("Line {line_no}: unknown participant '{name}'").into())
    }

    fn display_name<'a>(&'a self, id: &'a ParticipantId) -> &'a str {
        self.names_by_id
            .get(id)
            .map(String::as_str)
            .unwrap_or_else(|| id.as_str())
    }

    fn parse_line_item(&self, item: &str, line_no: usize) -> CliResult<PaymentLine> {
        let Some((name, amount)) = item.split_once('=') else {
            return Err(format!("Line {line_no}: expected NAME=AMOUNT, got '{item}'").into());
        };
        let amount: i64 = amount
            .parse()
            .map_err(|_| format!("Line {line_no}: invalid amount '{amount}'"))?;
        Ok(PaymentLine {
            to: self.resolve(name, line_no)?,
            amount: Money::from_i64(amount),
        })
    }
}

fn expect_arg<'s>(arg: Option<&'s str>, usage: &str, line_no: usize) -> CliResult<&'s str> {
    arg.ok_or_else(|| format!("Line {line_no}: usage: {usage}").into())
}
