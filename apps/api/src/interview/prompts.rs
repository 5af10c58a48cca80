// Prompt templates for the interview pipeline.
// Placeholders in `{braces}` are filled with `str::replace` by the orchestrator.

pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Below is a conversation between a voice assistant and a candidate who is setting up a mock job interview.

Extract the interview parameters the candidate asked for:
- role: the job role being interviewed for (e.g. "Frontend Developer")
- level: the experience level (e.g. "Junior", "Mid", "Senior")
- techstack: the technologies to cover, as a single comma-separated string (e.g. "React,TypeScript,Node.js")
- type: the focus of the questions, one of "technical", "behavioural" or "mixed"
- amount: how many questions to prepare, as an integer

If a value was never mentioned, use an empty string (or null for amount).

Return ONLY a JSON object with exactly these keys:
{"role": "...", "level": "...", "techstack": "...", "type": "...", "amount": 5}

CONVERSATION (JSON array of messages):
{conversation_json}"#;

pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Prepare questions for a job interview.
The job role is {role}.
The job experience level is {level}.
The tech stack used in the job is: {techstack}.
The focus between behavioural and technical questions should lean towards: {type}.
The amount of questions required is: {amount}.
Please return only the questions, without any additional text.
The questions are going to be read by a voice assistant so do not use "/" or "*" or any other special characters which might break the voice assistant.
Return the questions formatted like this:
["Question 1", "Question 2", "Question 3"]"#;
