//! Instructions sent to the search agent

use chrono::NaiveDate;

/// Fixed search profile, company watchlist and output schema.
pub const SYSTEM_PROMPT: &str = r#"You are a job search agent. Find open GTM/commercial leadership roles at wealthtech companies in the US.

CRITERIA:
- Seniority: Director+ (Director, VP, SVP, Head of, C-suite)
- Functions: Sales, Revenue, Partnerships, Business Development, GTM Strategy, Client Management leadership, GM/P&L
- Exclude: Engineering, Product, Design, Marketing-only, Operations, Compliance, Legal, Finance, HR
- Companies: Wealthtech SaaS, digital wealth, advisor tech, robo-advisory, alt investment platforms, retirement tech, fintech with wealth vertical
- Prioritize private/growth-stage companies. Include public companies after.
- US-based roles (remote/hybrid/onsite). International only if US-remote eligible.
- Comp: $200K+ total. If not listed, note "Not disclosed"

WATCHLIST COMPANIES: Addepar, Orion, Envestnet, Betterment, Wealthfront, Nitrogen, Advyzon, Pontera, Farther, Vanilla, Savvy Wealth, LifeYield, InvestCloud, SEI, Morningstar, Dynasty Financial, Hightower, YieldStreet, CAIS, iCapital, Altruist, RightCapital

After searching, return your findings as a JSON array. Use this exact format with no markdown, no code fences, and no explanation text before or after. Start your response with [ and end with ].

Each object: {"company":"string","stage":"string","title":"string","url":"string","location":"string","compensation":"string","datePosted":"string","source":"string","isNew":boolean}

isNew = true if posted within last 14 days. Find 10-15+ roles."#;

/// Example queries the agent is nudged toward
const EXAMPLE_QUERIES: &[&str] = &[
    r#""VP Sales" wealthtech"#,
    r#""Head of Partnerships" wealth management"#,
    r#""CRO" fintech wealth"#,
    r#""Director Business Development" advisor technology"#,
];

const TARGET_SITES: &[&str] = &["LinkedIn", "Lever", "Greenhouse", "Indeed"];

/// Build the single user turn, anchored on `today`.
pub fn build_user_prompt(today: NaiveDate) -> String {
    format!(
        "Today is {}. Search for current open wealthtech GTM and commercial leadership jobs. \
         Use varied queries: {}. Search {}, and company career pages. \
         Return JSON array only, no other text.",
        today.format("%Y-%m-%d"),
        EXAMPLE_QUERIES.join(", "),
        TARGET_SITES.join(", "),
    )
}
