// All LLM prompt constants for the guidance module.
// Reuses the cross-cutting JSON-only fragment from llm_client::prompts.

/// System prompt for career guidance — enforces JSON-only output.
pub const GUIDANCE_SYSTEM: &str = "You are a professional career advisor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Career guidance prompt template. Replace `{program}` before sending.
pub const GUIDANCE_PROMPT_TEMPLATE: &str = r#"Provide comprehensive career guidance for someone studying {program}.

Return the response as valid JSON with this EXACT structure:
{
    "keySkills": [
        "Skill 1",
        "Skill 2",
        "Skill 3",
        "Skill 4",
        "Skill 5"
    ],
    "careerPaths": [
        "Career Path 1",
        "Career Path 2",
        "Career Path 3",
        "Career Path 4",
        "Career Path 5"
    ],
    "certifications": [
        "Certification 1",
        "Certification 2",
        "Certification 3",
        "Certification 4"
    ],
    "industryTrends": [
        "Industry Trend 1",
        "Industry Trend 2",
        "Industry Trend 3",
        "Industry Trend 4"
    ]
}

Requirements:
- Provide 5-8 key skills that are essential for this field
- List 5-7 realistic career paths/job titles
- Include 4-6 relevant certifications or qualifications
- Describe 4-5 current industry trends affecting this field
- All entries should be concise but informative (1-2 sentences max)
- Return ONLY valid JSON, no additional text or markdown"#;

/// Job recommendations prompt template. Replace `{program}` before sending.
pub const RECOMMENDATIONS_PROMPT_TEMPLATE: &str = r#"Provide a structured JSON response with career opportunities for a degree in {program}.
The JSON must have this format:
{
  "jobs": [
    {
      "title": "Job Title",
      "description": "Brief job description.",
      "skills": ["Skill1", "Skill2"],
      "education": "Required education level",
      "outlook": "Job market outlook",
      "salary": "Average salary range"
    }
  ]
}"#;
