//! Server-side HTML for browsers. Every interpolated value goes through
//! [`escape_html`].

use std::fmt::Write as _;

use paddy_schemas::UnifiedOrders;

use crate::state::BuildInfo;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;width:100%}\
th,td{padding:.4rem .6rem;border-bottom:1px solid #ddd;text-align:left}\
tr:nth-child(even){background:#f7f7f7}\
.notice{background:#fff4e5;border:1px solid #f0b45c;padding:.6rem;margin-bottom:1rem}";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

pub fn home_page(build: &BuildInfo) -> String {
    let body = format!(
        "<h1>Orders</h1>\n\
         <p><a href=\"/orders\">View recent orders</a></p>\n\
         <p><small>{} {}</small></p>",
        escape_html(build.service),
        escape_html(build.version)
    );
    page("Orders", &body)
}

pub fn orders_page(unified: &UnifiedOrders) -> String {
    let mut body = String::from("<h1>Recent orders</h1>\n");

    let failed = unified.failed_origins();
    if !failed.is_empty() {
        let names: Vec<String> = failed.iter().map(|o| escape_html(o.as_str())).collect();
        let _ = writeln!(
            body,
            "<div class=\"notice\">Some sources could not be reached: {}. \
             Showing partial results.</div>",
            names.join(", ")
        );
    }

    if unified.orders.is_empty() {
        body.push_str("<p>No orders found.</p>");
        return page("Recent orders", &body);
    }

    body.push_str(
        "<table>\n<thead><tr><th>Order #</th><th>Customer</th><th>Order date</th>\
         <th>Deliver on</th><th>Total</th><th>Status</th><th>Origin</th></tr></thead>\n<tbody>\n",
    );
    for o in &unified.orders {
        let _ = writeln!(
            body,
            "<tr><td><a href=\"/orders/{origin}/{id}\">{number}</a></td><td>{customer}</td>\
             <td>{date}</td><td>{deliver}</td><td>{total}</td><td>{status}</td><td>{origin}</td></tr>",
            origin = escape_html(o.origin.as_str()),
            id = escape_html(&o.id),
            number = o.order_number,
            customer = escape_html(&o.customer),
            date = escape_html(&o.order_date_display),
            deliver = escape_html(&o.deliver_on),
            total = escape_html(&o.total),
            status = escape_html(&o.status),
        );
    }
    body.push_str("</tbody>\n</table>");
    page("Recent orders", &body)
}
