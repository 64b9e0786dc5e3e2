//! Command-line front end
//!
//! Every command renders either plain text or, with `--json`, an
//! [`ApiResponse`] envelope.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::models::OrderStatus;
use shared::util::format_amount;
use shared::view::{DateFilter, OrderViewState, StatusFilter};
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::core::DeskState;
use crate::orders::{DashboardOrder, OrderFilterEngine, OrderListing};
use crate::services::group_sides_by_type;
use crate::utils::time::parse_date;
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Parser, Debug)]
#[command(name = "order-desk", author, version, about)]
pub struct Cli {
    /// Print JSON envelopes instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Sign in with this email before running the command
    #[arg(long, env = "DESK_EMAIL", global = true)]
    pub email: Option<String>,

    #[arg(long, env = "DESK_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List orders, newest first
    Orders {
        /// all | pending | confirmed | preparing | delivering | delivered | cancelled
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// all | today | yesterday | this_week | last_7_days | custom
        #[arg(long, default_value = "all")]
        date: DateFilter,
        /// Calendar day (YYYY-MM-DD); implies `--date custom`
        #[arg(long, value_parser = parse_day)]
        on: Option<NaiveDate>,
    },
    /// Show one order with its line items
    Order { id: i64 },
    /// Change an order's status
    SetStatus { id: i64, status: OrderStatus },
    /// Dashboard overview and payments revenue
    Stats,
    Categories,
    Foods {
        /// Only foods of this category
        #[arg(long)]
        category: Option<i64>,
    },
    Sides,
    /// Upload an image and print its public URL
    Upload { file: PathBuf },
}

impl Command {
    /// View state selected by an `orders` invocation
    pub fn view_state(&self) -> Option<OrderViewState> {
        let Command::Orders { status, date, on } = self else {
            return None;
        };
        let date = if on.is_some() { DateFilter::Custom } else { *date };
        Some(
            OrderViewState::default()
                .with_status(*status)
                .with_date_filter(date)
                .with_custom_date(*on),
        )
    }
}

/// Output of `orders`: the listing plus anything that went wrong fetching it
#[derive(Debug, Serialize)]
struct OrderPage<'a> {
    orders: Vec<OrderListing<'a, DashboardOrder>>,
    notices: Vec<ApiResponse<()>>,
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.message)
}

fn render<T: Serialize>(json: bool, data: T, text: impl FnOnce(&T) -> String) -> AppResult<String> {
    if json {
        serde_json::to_string_pretty(&ApiResponse::success(data))
            .map_err(|e| AppError::internal(format!("Failed to encode output: {}", e)))
    } else {
        Ok(text(&data))
    }
}

fn local_time(instant: &chrono::DateTime<chrono::Utc>) -> String {
    instant.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Sign in if credentials were given, then run the command
pub async fn run(cli: &Cli, state: &DeskState) -> AppResult<String> {
    if let (Some(email), Some(password)) = (&cli.email, &cli.password) {
        state.auth.sign_in(email, password).await?;
    }
    execute(&cli.command, cli.json, state).await
}

/// Run one command and render its output
pub async fn execute(command: &Command, json: bool, state: &DeskState) -> AppResult<String> {
    match command {
        Command::Orders { .. } => {
            let view = command.view_state().unwrap_or_default();
            let batch = state.orders.load_order_batch().await;
            let engine = OrderFilterEngine::local(view);
            let page = OrderPage {
                orders: engine.listing(&batch.orders),
                notices: batch.notices.iter().cloned().map(ApiResponse::from).collect(),
            };

            render(json, page, |page| {
                let mut out = String::new();
                for notice in &page.notices {
                    let _ = writeln!(out, "! {}", notice.message);
                }
                if page.orders.is_empty() {
                    out.push_str("No orders found.\n");
                }
                for row in &page.orders {
                    let order = &row.entry.order;
                    let _ = writeln!(
                        out,
                        "#{:<6} {}  {:<10} {:>12}  {} <{}> ({}, {})  {}",
                        order.id,
                        local_time(&order.created_at),
                        order.status,
                        format_amount(order.total_amount),
                        row.entry.customer_name(),
                        row.entry.owner_ref(),
                        row.entry.phone(),
                        row.entry.email(),
                        row.items_summary,
                    );
                }
                out
            })
        }
        Command::Order { id } => {
            let detail = state.orders.order_detail(*id).await?;
            render(json, detail, |d| {
                let mut out = String::new();
                let _ = writeln!(out, "Order #{}", d.order.id);
                let _ = writeln!(out, "Placed:   {}", local_time(&d.order.created_at));
                let _ = writeln!(out, "Status:   {}", d.order.status.label());
                let _ = writeln!(out, "Address:  {}", d.order.delivery_address);
                let _ = writeln!(out, "Total:    {}", format_amount(d.order.total_amount));
                for item in &d.items {
                    let _ = writeln!(
                        out,
                        "  {}x {}  @ {}  = {}",
                        item.quantity,
                        item.display_name(),
                        format_amount(item.price_at_time),
                        format_amount(item.line_total()),
                    );
                }
                out
            })
        }
        Command::SetStatus { id, status } => {
            state.orders.update_status(*id, *status).await?;
            let order = state.orders.get_order(*id).await?;
            render(json, order, |o| format!("Order #{} is now {}\n", o.id, o.status))
        }
        Command::Stats => {
            let overview = state.orders.dashboard_overview().await?;
            let payments = state.orders.payments_summary().await?;
            let data = serde_json::json!({ "overview": overview, "payments_revenue": payments.total_revenue });
            render(json, data, |_| {
                let mut out = String::new();
                let stats = &overview.stats;
                let _ = writeln!(out, "Total revenue:     {}", format_amount(stats.total_revenue));
                let _ = writeln!(out, "Payments revenue:  {}", format_amount(payments.total_revenue));
                let _ = writeln!(out, "Total orders:      {}", stats.total_orders);
                let _ = writeln!(out, "Pending orders:    {}", stats.pending_orders);
                let _ = writeln!(out, "Delivered orders:  {}", stats.delivered_orders);
                let _ = writeln!(out, "Recent:");
                for o in &overview.recent_orders {
                    let _ = writeln!(
                        out,
                        "  #{} {} {}",
                        o.id,
                        o.status.label(),
                        format_amount(o.total_amount)
                    );
                }
                out
            })
        }
        Command::Categories => {
            let categories = state.menu.list_categories().await?;
            render(json, categories, |list| {
                list.iter()
                    .map(|c| format!("{:<6} {}\n", c.id, c.name))
                    .collect()
            })
        }
        Command::Foods { category } => {
            let foods = state.menu.list_foods(*category).await?;
            render(json, foods, |list| {
                list.iter()
                    .map(|f| {
                        format!(
                            "{:<6} {:<28} {:<16} {:>12}  {}\n",
                            f.id,
                            f.name,
                            f.category_name().unwrap_or("-"),
                            format_amount(f.price),
                            if f.is_available { "available" } else { "unavailable" },
                        )
                    })
                    .collect()
            })
        }
        Command::Sides => {
            let sides = state.menu.list_sides().await?;
            render(json, group_sides_by_type(&sides), |groups| {
                let mut out = String::new();
                for group in groups {
                    let _ = writeln!(out, "[{}]", group.side_type);
                    for side in &group.sides {
                        let _ = writeln!(
                            out,
                            "  {:<6} {:<24} {:>10}",
                            side.id,
                            side.name,
                            format_amount(side.price)
                        );
                    }
                }
                out
            })
        }
        Command::Upload { file } => {
            let uploaded = state.images.upload_file(file).await?;
            render(json, uploaded, |u| format!("{}\n", u.public_url))
        }
    }
}
