use crate::model::{Domain, Entity, Fact, Gap, OverlapCandidate};

fn render_facts(entity: Entity, facts: &[Fact]) -> String {
    let lines: Vec<String> = facts
        .iter()
        .filter(|f| f.entity == entity)
        .map(|f| format!("- {}: {}", f.id, f.claim))
        .collect();
    if lines.is_empty() {
        format!("{} facts: none documented\n", capitalize(entity.as_str()))
    } else {
        format!("{} facts:\n{}\n", capitalize(entity.as_str()), lines.join("\n"))
    }
}

fn render_gaps(gaps: &[Gap]) -> String {
    if gaps.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = gaps
        .iter()
        .map(|g| format!("- [{}] {}", g.entity, g.description))
        .collect();
    format!("Known information gaps:\n{}\n\n", lines.join("\n"))
}

/// Overlap context is enumerated verbatim: id, classification, contributing
/// fact ids and rationale for every candidate, so the capability can ground
/// buyer-aware fields instead of guessing that "facts exist".
fn render_overlaps(overlaps: &[OverlapCandidate]) -> String {
    if overlaps.is_empty() {
        return "Detected overlaps with the buyer estate: none\n\n".to_string();
    }
    let lines: Vec<String> = overlaps
        .iter()
        .map(|o| {
            format!(
                "- {}: {} between target fact {} and buyer fact {} ({})",
                o.id,
                o.classification,
                o.target_fact
                    .as_ref()
                    .map(|f| f.as_str())
                    .unwrap_or("<none>"),
                o.buyer_fact
                    .as_ref()
                    .map(|f| f.as_str())
                    .unwrap_or("<none>"),
                o.rationale
            )
        })
        .collect();
    format!(
        "Detected overlaps with the buyer estate:\n{}\n\n",
        lines.join("\n")
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub(crate) fn build_findings_prompt(
    domain: Domain,
    facts: &[Fact],
    gaps: &[Gap],
    overlaps: &[OverlapCandidate],
) -> String {
    format!(
        r#"You are performing technology due diligence for an M&A transaction. Analyze the "{}" domain of the acquisition target, in the context of the buyer's estate.

{}
{}{}{}Produce findings. Every finding MUST cite at least one fact id from the lists above; findings without citations will be discarded. Where a finding follows from a detected overlap, reference the overlap id. For each finding, distinguish what the target must do regardless of buyer ("target_action") from what changes when integrating with this specific buyer ("integration_option").

Respond with a JSON object:
{{
  "risks": [
    {{"description": "...", "citations": ["target-{}-0001"], "overlap_id": null,
      "severity": "low|medium|high|critical", "target_action": "...", "integration_option": null}}
  ],
  "work_items": [
    {{"description": "...", "citations": ["..."], "overlap_id": null,
      "phase": "day_1|day_100|post_100", "cost_category": "{}", "base_cost": 100000,
      "target_action": null, "integration_option": null}}
  ],
  "recommendations": [
    {{"description": "...", "citations": ["..."], "overlap_id": null,
      "priority": "low|medium|high", "target_action": null, "integration_option": null}}
  ],
  "strategic_considerations": [
    {{"description": "...", "citations": ["..."], "overlap_id": null,
      "priority": "low|medium|high", "target_action": null, "integration_option": null}}
  ]
}}

Use empty arrays for categories with nothing to report.
"#,
        domain,
        render_facts(Entity::Target, facts),
        render_facts(Entity::Buyer, facts),
        render_gaps(gaps),
        render_overlaps(overlaps),
        domain,
        domain,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FactAttributes, FactId, OverlapClass, OverlapId, Provenance};

    #[test]
    fn test_prompt_enumerates_overlap_context_verbatim() {
        let fact = Fact {
            id: FactId::new(Entity::Target, Domain::Applications, 1),
            domain: Domain::Applications,
            entity: Entity::Target,
            claim: "SAP ECC 6.0, out of mainstream maintenance".to_string(),
            attributes: FactAttributes::default(),
            provenance: Provenance::new("apps.xlsx"),
            confidence: 0.95,
        };
        let overlap = OverlapCandidate {
            id: OverlapId::new(Domain::Applications, 1),
            domain: Domain::Applications,
            classification: OverlapClass::CapabilityOverlap,
            target_fact: Some(fact.id.clone()),
            buyer_fact: Some(FactId::new(Entity::Buyer, Domain::Applications, 4)),
            rationale: "both run SAP ERP".to_string(),
        };

        let prompt = build_findings_prompt(Domain::Applications, &[fact], &[], &[overlap]);
        assert!(prompt.contains("overlap-applications-001"));
        assert!(prompt.contains("capability_overlap"));
        assert!(prompt.contains("target-applications-0001"));
        assert!(prompt.contains("buyer-applications-0004"));
        assert!(prompt.contains("both run SAP ERP"));
    }

    #[test]
    fn test_prompt_marks_empty_buyer_side() {
        let prompt = build_findings_prompt(Domain::Organization, &[], &[], &[]);
        assert!(prompt.contains("Target facts: none documented"));
        assert!(prompt.contains("Buyer facts: none documented"));
        assert!(prompt.contains("Detected overlaps with the buyer estate: none"));
    }

    #[test]
    fn test_prompt_lists_gaps() {
        let gap = Gap {
            id: crate::model::GapId::new(Entity::Target, Domain::Organization, 1),
            domain: Domain::Organization,
            entity: Entity::Target,
            description: "no org chart for the IT function was provided".to_string(),
            provenance: Provenance::new("request-list.xlsx"),
        };

        let prompt = build_findings_prompt(Domain::Organization, &[], &[gap], &[]);
        assert!(prompt.contains("Known information gaps:"));
        assert!(prompt.contains("- [target] no org chart for the IT function was provided"));
    }
}
