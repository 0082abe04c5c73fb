// Prompt templates for the interview AI. Placeholders in `{braces}` are
// filled by `fill_template`; every template asks for a single JSON object.

pub const INTERVIEWER_SYSTEM: &str = "You are an experienced technical interviewer and career coach. \
    You write realistic interview questions and give candid, constructive feedback.";

/// Replace `{count}`, `{job_role}`, `{experience_level}`, `{company_line}`, `{categories}`.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Create {count} interview questions for a {experience_level} {job_role} candidate.
{company_line}
Only use these question types: {categories}.
Order the questions the way a real interviewer would ask them.

Return a JSON object with this EXACT schema:
{
  "questions": [
    {"type": "technical", "text": "How would you design a rate limiter?"}
  ]
}
"type" must be one of "technical", "behavioral", "company-specific"."#;

/// Replace `{job_role}`, `{experience_level}`, `{question_type}`, `{question}`, `{answer}`.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Evaluate this answer from a {experience_level} {job_role} candidate.

Question ({question_type}): {question}

Answer: {answer}

Return a JSON object with this EXACT schema:
{
  "score": 75,
  "feedback": "Two or three sentences of constructive feedback.",
  "strengths": ["short phrase"],
  "weaknesses": ["short phrase"]
}
"score" is an integer from 1 to 100. Give at most three strengths and three weaknesses."#;

/// Replace `{job_role}`, `{experience_level}`, `{transcript}`.
pub const REPORT_PROMPT_TEMPLATE: &str = r#"Write an interview readiness report for a {experience_level} {job_role} candidate.

Interview transcript (JSON):
{transcript}

Return a JSON object with this EXACT schema:
{
  "readinessScore": 78,
  "strengths": ["short phrase"],
  "weaknesses": ["short phrase"],
  "categoryScores": {"Technical Knowledge": 80, "Communication": 75},
  "recommendations": ["one concrete next step"]
}
All scores are integers from 1 to 100."#;

/// Fills `{name}` placeholders in a single left-to-right pass.
/// Inserted values are never rescanned, so braces in user input stay literal.
/// Unknown `{...}` sequences (the JSON examples) are copied through.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        filled.push_str(&rest[..start]);
        let open = &rest[start + 1..];
        let matched = values.iter().find_map(|&(key, value)| {
            open.strip_prefix(key)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (value, tail))
        });
        match matched {
            Some((value, tail)) => {
                filled.push_str(value);
                rest = tail;
            }
            None => {
                filled.push('{');
                rest = open;
            }
        }
    }
    filled.push_str(rest);
    filled
}
