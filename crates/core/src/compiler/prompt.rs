use std::fmt::Write as _;

use crate::domain::business_config::BusinessConfig;

/// Renders the system prompt for the remote voice agent.
///
/// A non-empty user-authored `system_prompt` is returned verbatim; the
/// synthesized prompt only applies when the user has not written one.
/// Blocks are emitted in a fixed order so identical input yields
/// byte-identical output.
pub fn compile_system_prompt(config: &BusinessConfig) -> String {
    if !config.system_prompt.trim().is_empty() {
        return config.system_prompt.clone();
    }

    let mut out = String::new();
    let terms = &config.terms;

    let _ = writeln!(
        out,
        "You are {}, the virtual receptionist for {}.",
        config.agent_name, config.name
    );
    let _ = writeln!(out, "Your personality is {}.", config.personality);
    out.push('\n');

    out.push_str("BUSINESS INFORMATION\n");
    let _ = writeln!(out, "Name: {}", config.name);
    if !config.tagline.is_empty() {
        let _ = writeln!(out, "Tagline: {}", config.tagline);
    }
    if !config.description.is_empty() {
        let _ = writeln!(out, "About: {}", config.description);
    }
    if !config.phone.is_empty() {
        let _ = writeln!(out, "Phone: {}", config.phone);
    }
    if !config.email.is_empty() {
        let _ = writeln!(out, "Email: {}", config.email);
    }
    if !config.website.is_empty() {
        let _ = writeln!(out, "Website: {}", config.website);
    }
    if !config.address.is_empty() {
        let _ = writeln!(out, "Address: {}", config.address.render());
    }
    out.push('\n');

    out.push_str("HOURS\n");
    let _ = writeln!(out, "Monday-Friday: {}", config.hours.weekdays);
    let _ = writeln!(out, "Saturday: {}", config.hours.saturday);
    let _ = writeln!(out, "Sunday: {}", config.hours.sunday);
    out.push('\n');

    if !config.staff.name.is_empty() {
        let _ = writeln!(
            out,
            "STAFF\n{} ({}): {}",
            config.staff.name, config.staff.title, config.staff.bio
        );
        out.push('\n');
    }

    if !config.services.is_empty() {
        let _ = writeln!(out, "OUR {}S", terms.service.to_uppercase());
        for service in &config.services {
            let _ = writeln!(
                out,
                "- {}: {} minutes, ${} - {}",
                service.name, service.duration_minutes, service.price, service.description
            );
        }
        out.push('\n');
    }

    if !config.faqs.is_empty() {
        out.push_str("FREQUENTLY ASKED QUESTIONS\n");
        for faq in &config.faqs {
            let _ = writeln!(out, "Q: {}", faq.question);
            let _ = writeln!(out, "A: {}", faq.answer);
        }
        out.push('\n');
    }

    if !config.knowledge.is_empty() {
        out.push_str("ADDITIONAL KNOWLEDGE\n");
        for entry in &config.knowledge {
            let _ = writeln!(out, "{}: {}", entry.title, entry.content);
        }
        out.push('\n');
    }

    out.push_str("YOUR ROLE\n");
    let _ = writeln!(
        out,
        "You help each {customer} learn about the business, answer questions about any \
         {service}, and schedule a new {appointment}.",
        customer = terms.customer,
        service = terms.service,
        appointment = terms.appointment
    );
    out.push('\n');

    out.push_str("GUIDELINES\n");
    let _ = writeln!(
        out,
        "- Always collect the {customer}'s name and contact information before booking an \
         {appointment}.",
        customer = terms.customer,
        appointment = terms.appointment
    );
    let _ = writeln!(
        out,
        "- Confirm all {appointment} details with the {customer} before finalizing.",
        appointment = terms.appointment,
        customer = terms.customer
    );
    out.push_str(
        "- If you cannot help with a request, offer to take a message and escalate to a \
         staff member.\n",
    );

    out
}
