//! Instruction text sent to the completion provider.

use crate::types::AppealPromptInput;

const EXTRACTION_PROMPT: &str = "\
You are reading a photograph of a UK parking fine notice (Penalty Charge Notice or Parking Charge Notice).
Extract the following fields from the notice:
- fineAmount: the amount payable, including the currency symbol
- infractionDate: the date (and time, if shown) of the contravention
- locationAddress: the street or car park where the contravention occurred
- carRegistration: the vehicle registration mark
- fineReferenceNumber: the PCN or reference number
- allegedContravention: the contravention code and description, if shown

Respond with ONLY a JSON object using exactly those keys. Use an empty string for any field you cannot read. \
Do not wrap the JSON in markdown and do not add any commentary.";

/// Build the appeal-assessment instruction from normalized request fields.
pub fn appeal_prompt(input: &AppealPromptInput) -> String {
    let fine = &input.fine;
    let appeal = &input.appeal;

    format!(
        "You are an expert in UK parking fine appeals. Assess how likely the following appeal is to succeed.\n\
         \n\
         Fine details:\n\
         - Contravention code: {code}\n\
         - Location: {location}\n\
         - Date: {date}\n\
         - Amount: {amount}\n\
         - Reason for fine: {reason}\n\
         \n\
         Appeal:\n\
         - Category: {category}\n\
         - Reason: {selected}\n\
         - Additional notes: {notes}\n\
         \n\
         Respond with ONLY a JSON object with exactly these keys:\n\
         {{\"appeal_strength\": \"strong\" | \"medium\" | \"weak\", \
         \"confidence_score\": <integer from 0 to 100>, \
         \"reasoning_summary\": \"<no more than two sentences>\"}}\n\
         Do not wrap the JSON in markdown and do not add any commentary.",
        code = fine.contravention_code,
        location = fine.location,
        date = fine.date,
        amount = fine.amount,
        reason = fine.reason,
        category = appeal.category,
        selected = appeal.selected_reason,
        notes = appeal.notes,
    )
}

/// Instruction for reading a photographed fine notice.
pub fn extraction_prompt() -> &'static str {
    EXTRACTION_PROMPT
}
