use std::fmt::Write as _;

use crate::domain::business_config::BusinessConfig;

const SECTION_DELIMITER: &str = "\n---\n";

/// Renders the knowledge-base document uploaded to the agent provider.
///
/// Sections appear in fixed input order: business summary, one per service,
/// one per FAQ, then one "Additional Information" subsection per knowledge
/// entry. No sorting, so the document is stable across calls.
pub fn compile_knowledge_base(config: &BusinessConfig) -> String {
    let mut sections: Vec<String> = Vec::new();

    let mut summary = String::new();
    let _ = writeln!(summary, "# {}", config.name);
    if !config.tagline.is_empty() {
        let _ = writeln!(summary, "{}", config.tagline);
    }
    if !config.description.is_empty() {
        let _ = writeln!(summary, "{}", config.description);
    }
    let _ = writeln!(summary, "Industry: {}", config.industry.as_str());
    if !config.phone.is_empty() {
        let _ = writeln!(summary, "Phone: {}", config.phone);
    }
    if !config.address.is_empty() {
        let _ = writeln!(summary, "Address: {}", config.address.render());
    }
    let _ = writeln!(summary, "Hours Monday-Friday: {}", config.hours.weekdays);
    let _ = writeln!(summary, "Hours Saturday: {}", config.hours.saturday);
    let _ = write!(summary, "Hours Sunday: {}", config.hours.sunday);
    sections.push(summary);

    for service in &config.services {
        let mut section = String::new();
        let _ = writeln!(section, "## {}", service.name);
        let _ = writeln!(section, "Duration: {} minutes", service.duration_minutes);
        let _ = writeln!(section, "Price: ${}", service.price);
        let _ = write!(section, "{}", service.description);
        sections.push(section);
    }

    for faq in &config.faqs {
        let mut section = String::new();
        let _ = writeln!(section, "## Q: {}", faq.question);
        let _ = write!(section, "{}", faq.answer);
        sections.push(section);
    }

    for entry in &config.knowledge {
        let mut section = String::new();
        let _ = writeln!(section, "## Additional Information: {}", entry.title);
        let _ = write!(section, "{}", entry.content);
        sections.push(section);
    }

    sections.join(SECTION_DELIMITER)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::business::{
        Business, FaqEntry, Industry, KnowledgeEntry, ServiceOffering, UserId,
    };
    use crate::domain::business_config::BusinessConfig;

    use super::{compile_knowledge_base, SECTION_DELIMITER};

    fn config() -> BusinessConfig {
        let mut business =
            Business::new(UserId("u-1".to_string()), "Shear Genius", Industry::Salon);
        business.services.push(ServiceOffering {
            name: "Haircut".to_string(),
            description: "Wash, cut, and style".to_string(),
            duration_minutes: 45,
            price: Decimal::new(65, 0),
        });
        business.services.push(ServiceOffering {
            name: "Color".to_string(),
            description: String::new(),
            duration_minutes: 90,
            price: Decimal::new(140, 0),
        });
        business.faqs.push(FaqEntry {
            question: "Do you take walk-ins?".to_string(),
            answer: "Yes, when a chair is free.".to_string(),
        });
        business.knowledge.push(KnowledgeEntry {
            title: "Parking".to_string(),
            content: "Free lot behind the building.".to_string(),
        });
        BusinessConfig::derive(&business, None)
    }

    #[test]
    fn sections_preserve_input_order() {
        let document = compile_knowledge_base(&config());
        let sections: Vec<&str> = document.split(SECTION_DELIMITER).collect();
        assert_eq!(sections.len(), 5);
        assert!(sections[0].starts_with("# Shear Genius"));
        assert!(sections[1].starts_with("## Haircut"));
        assert!(sections[2].starts_with("## Color"));
        assert!(sections[3].starts_with("## Q: Do you take walk-ins?"));
        assert!(sections[4].starts_with("## Additional Information: Parking"));
    }

    #[test]
    fn knowledge_section_only_emitted_when_present() {
        let mut config = config();
        config.knowledge.clear();
        let document = compile_knowledge_base(&config);
        assert!(!document.contains("Additional Information"));
    }

    #[test]
    fn compile_is_deterministic() {
        let config = config();
        assert_eq!(compile_knowledge_base(&config), compile_knowledge_base(&config));
    }
}
