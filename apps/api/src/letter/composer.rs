//! Draft Composer: fills the fixed letter skeleton from a validated request.
//!
//! Output layout: contact header block, then four body blocks (salutation and
//! opening, achievement, skills alignment, closing), joined by a blank line.
//! Emphasis is always written as matched `**` pairs so the markup translator's
//! parity rule lines up with it.

use crate::letter::request::{ContactDetails, LetterRequest};

/// Separator between blocks of a draft.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Builds the contact header block. The name is the only emphasized span.
pub fn contact_header(contact: &ContactDetails) -> String {
    format!(
        "**{}**\n{} | {}\n{}",
        contact.name, contact.phone, contact.email, contact.url
    )
}

/// Composes a complete letter draft. Deterministic in its inputs.
pub fn compose(request: &LetterRequest, contact: &ContactDetails) -> String {
    let tone = request.tone.label();
    let company = &request.company;

    let opening = format!(
        "Dear Hiring Team,\n\
        I am writing to express my enthusiastic interest in the **{title}** position at **{company}**. \
        Having closely followed {company}'s innovative work in [Relevant Industry], I am highly motivated \
        by the opportunity to contribute my proven track record in {leading}, which align directly with \
        the core demands of this role. My experience is centered on driving tangible results and \
        leveraging technical expertise to achieve business objectives.",
        title = request.job_title,
        leading = request.leading_skills(),
    );

    let achievement = format!(
        "Throughout my career, I have consistently exceeded performance goals by focusing on measurable \
        impact. For instance, in a previous role, I successfully [elaborate on a key achievement from the \
        Experience Summary] resulting in a **[use a number/percentage, e.g., 25%] increase in [metric, \
        e.g., operational efficiency]** and **[use another measurable outcome, e.g., $50,000] in cost \
        savings** over a fiscal year. I am confident in my ability to bring the same level of **{tone}** \
        drive and commitment to excellence to your team, immediately addressing the need for a \
        professional skilled in [another highlighted skill]."
    );

    let challenge_source = if request.job_description.trim().is_empty() {
        "this role"
    } else {
        "the job description"
    };
    let alignment = format!(
        "My specific technical abilities, including **{skills}**, are perfectly suited to the challenges \
        outlined in {challenge_source}, especially in the areas of [mention a specific challenge or \
        requirement]. I excel at translating complex technical requirements into actionable plans and \
        thrive in fast-paced environments where **{tone}** problem-solving is critical. This blend of \
        hands-on skill and strategic thinking positions me as an ideal candidate.",
        skills = request.all_skills(),
    );

    let closing = format!(
        "I am eager for the opportunity to discuss how my background can directly benefit {company}. \
        Thank you for your time and consideration.\n\
        Sincerely,\n\
        {name}",
        name = contact.name,
    );

    [
        contact_header(contact),
        opening,
        achievement,
        alignment,
        closing,
    ]
    .join(BLOCK_SEPARATOR)
}
