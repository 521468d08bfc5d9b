use crate::model::{Domain, Fact};

fn render_fact(fact: &Fact) -> String {
    let mut extras = Vec::new();
    if let Some(vendor) = &fact.attributes.vendor {
        extras.push(format!("vendor: {}", vendor));
    }
    if let Some(category) = &fact.attributes.category {
        extras.push(format!("category: {}", category));
    }
    if let Some(users) = fact.attributes.user_count {
        extras.push(format!("users: {}", users));
    }
    if extras.is_empty() {
        format!("- {}: {}", fact.id, fact.claim)
    } else {
        format!("- {}: {} ({})", fact.id, fact.claim, extras.join(", "))
    }
}

fn render_side(label: &str, facts: &[&Fact]) -> String {
    if facts.is_empty() {
        format!("{} facts: none documented\n", label)
    } else {
        let lines: Vec<String> = facts.iter().map(|f| render_fact(f)).collect();
        format!("{} facts:\n{}\n", label, lines.join("\n"))
    }
}

pub(crate) fn build_comparison_prompt(
    domain: Domain,
    target: &[&Fact],
    buyer: &[&Fact],
) -> String {
    format!(
        r#"You are comparing the IT estates of an acquisition target and a buyer in the "{}" domain.

{}
{}
Identify every meaningful relationship between a target capability and a buyer capability. Classify each relationship as exactly one of:
- "platform_alignment": both entities use the same or a compatible capability
- "platform_mismatch": incompatible competing capabilities
- "capability_gap": one entity lacks a capability the other has (leave the missing side null)
- "capability_overlap": redundant duplicate capability

Only reference fact ids listed above. Do not invent ids.

Respond with a JSON array:
[
  {{
    "target_fact_id": "target-{}-0001",
    "buyer_fact_id": "buyer-{}-0002",
    "classification": "platform_mismatch",
    "rationale": "one short sentence"
  }}
]

Return [] if there are no meaningful relationships.
"#,
        domain,
        render_side("Target", target),
        render_side("Buyer", buyer),
        domain,
        domain,
    )
}
