// ABOUTME: Prompt text for test generation conversations.
// ABOUTME: Detailed prompts for Ollama, shorter ones for LM Studio.

use super::ChatMessage;

pub(crate) const DETAILED_STEPS_SYSTEM: &str = "\
You are an expert test automation engineer specializing in Playwright test generation.
Given HTML content and a test objective, generate specific Playwright test steps.
Return only the steps as a JSON array of strings with valid Playwright syntax.

Focus on:
- Valid CSS selectors and locators
- Proper async/await syntax
- Clear assertions using expect()
- Realistic test scenarios
- Error handling considerations";

pub(crate) const CONCISE_STEPS_SYSTEM: &str = "\
You are an expert test automation engineer. Given HTML content and a test objective, \
generate specific Playwright test steps. Return only the steps as a JSON array of strings.";

pub(crate) const DETAILED_ANALYSIS_SYSTEM: &str = "\
You are an expert web analyzer and test strategist.
Analyze HTML structure and provide comprehensive insights about:
- Page layout and key sections
- Interactive elements (forms, buttons, links)
- Navigation patterns
- Accessibility considerations
- Potential testing strategies and edge cases
- Performance considerations

Provide actionable insights that can guide test creation.";

pub(crate) const CONCISE_ANALYSIS_SYSTEM: &str = "\
You are an expert web analyzer. Analyze the HTML structure and provide insights about \
the page layout, key elements, and potential testing strategies.";

pub(crate) const TEST_CODE_SYSTEM: &str = "\
You are an expert Playwright test code generator.
Generate complete, runnable Playwright test code with:
- Proper TypeScript syntax
- Import statements for @playwright/test
- Describe blocks for organization
- Multiple test cases covering different scenarios
- Proper error handling
- Realistic selectors based on the HTML
- Clear test descriptions
- Assertions that verify expected behavior";

/// System instruction followed by one user message.
pub(crate) fn conversation(system: &str, user: String) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

pub(crate) fn detailed_steps(page_content: &str, test_objective: &str) -> Vec<ChatMessage> {
    conversation(
        DETAILED_STEPS_SYSTEM,
        format!(
            "HTML Content: {page_content}\n\nTest Objective: {test_objective}\n\n\
             Generate specific Playwright test steps to achieve this objective. \
             Return as a JSON array of strings."
        ),
    )
}

pub(crate) fn concise_steps(page_content: &str, test_objective: &str) -> Vec<ChatMessage> {
    conversation(
        CONCISE_STEPS_SYSTEM,
        format!(
            "HTML Content: {page_content}\n\nTest Objective: {test_objective}\n\n\
             Generate specific Playwright test steps to achieve this objective."
        ),
    )
}

pub(crate) fn detailed_analysis(page_content: &str) -> Vec<ChatMessage> {
    conversation(
        DETAILED_ANALYSIS_SYSTEM,
        format!(
            "Analyze this HTML content and provide detailed insights for test planning:\n\n{page_content}"
        ),
    )
}

pub(crate) fn concise_analysis(page_content: &str) -> Vec<ChatMessage> {
    conversation(
        CONCISE_ANALYSIS_SYSTEM,
        format!("Analyze this HTML content and provide insights:\n\n{page_content}"),
    )
}

pub(crate) fn test_code(page_content: &str, test_objective: &str, page_name: &str) -> Vec<ChatMessage> {
    conversation(
        TEST_CODE_SYSTEM,
        format!(
            "Generate complete Playwright test code for:\n\n\
             Page Name: {page_name}\n\
             Test Objective: {test_objective}\n\
             HTML Content: {page_content}\n\n\
             Return only the TypeScript test code without any explanation."
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_steps_conversation_shape() {
        let messages = detailed_steps("<button id='go'>Go</button>", "click the go button");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("JSON array"));
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("<button id='go'>Go</button>"));
        assert!(messages[1].content.contains("Test Objective: click the go button"));
    }

    #[test]
    fn test_code_conversation_embeds_page_name() {
        let messages = test_code("<form/>", "submit form", "Login");
        assert!(messages[1].content.contains("Page Name: Login"));
        assert!(messages[1].content.contains("HTML Content: <form/>"));
    }

    #[test]
    fn test_analysis_conversations_embed_page() {
        assert!(detailed_analysis("<nav/>")[1].content.ends_with("<nav/>"));
        assert!(concise_analysis("<nav/>")[1].content.ends_with("<nav/>"));
    }
}
