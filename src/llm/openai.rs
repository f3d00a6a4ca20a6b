//! OpenAI-backed model handles.
//!
//! One [`OpenAiModel`] instance wraps one model name; the pipeline builds a
//! separate instance per logical role (decision, synthesis, report) so that
//! lifetimes and test substitution stay explicit.

use crate::llm::client::{Decision, DecisionModel, StructuredModel, SynthesisModel};
use crate::types::{AppError, Result, ToolCall, ToolDefinition, Turn};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
        ChatCompletionTools, CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
        ResponseFormat, ToolChoiceOptions,
    },
    Client,
};
use async_trait::async_trait;

/// A single OpenAI chat model exposed through the role contracts.
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiModel {
    /// Create a handle for `model` against an OpenAI-compatible endpoint.
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// The configured model name.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Map a conversation (plus an optional leading system instruction) into
    /// OpenAI request messages.
    fn build_messages(
        system: &str,
        conversation: &[Turn],
    ) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(conversation.len() + 1);

        if !system.is_empty() {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(system.to_string()),
            ));
        }

        for turn in conversation {
            match turn {
                Turn::System { content } => {
                    messages.push(ChatCompletionRequestMessage::System(
                        ChatCompletionRequestSystemMessage::from(content.clone()),
                    ));
                }
                Turn::Human { content } => {
                    messages.push(ChatCompletionRequestMessage::User(
                        ChatCompletionRequestUserMessage::from(content.clone()),
                    ));
                }
                Turn::Assistant {
                    content,
                    invocations,
                } => {
                    let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                    builder.content(content.clone());
                    if !invocations.is_empty() {
                        let calls: Vec<ChatCompletionMessageToolCalls> = invocations
                            .iter()
                            .map(|call| {
                                ChatCompletionMessageToolCalls::Function(
                                    ChatCompletionMessageToolCall {
                                        id: call.id.clone(),
                                        function: FunctionCall {
                                            name: call.name.clone(),
                                            arguments: call.arguments.to_string(),
                                        },
                                    },
                                )
                            })
                            .collect();
                        builder.tool_calls(calls);
                    }
                    let message = builder
                        .build()
                        .map_err(|e| AppError::Model(format!("Failed to build message: {}", e)))?;
                    messages.push(ChatCompletionRequestMessage::Assistant(message));
                }
                Turn::ToolResult {
                    invocation_id,
                    content,
                    ..
                } => {
                    let message = ChatCompletionRequestToolMessageArgs::default()
                        .content(content.clone())
                        .tool_call_id(invocation_id.clone())
                        .build()
                        .map_err(|e| AppError::Model(format!("Failed to build message: {}", e)))?;
                    messages.push(ChatCompletionRequestMessage::Tool(message));
                }
            }
        }

        Ok(messages)
    }
}

#[async_trait]
impl DecisionModel for OpenAiModel {
    async fn decide(
        &self,
        system: &str,
        conversation: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<Decision> {
        let messages = Self::build_messages(system, conversation)?;

        let openai_tools: Vec<ChatCompletionTools> = tools
            .iter()
            .map(|tool| {
                ChatCompletionTools::Function(ChatCompletionTool {
                    function: FunctionObject {
                        name: tool.name.clone(),
                        description: Some(tool.description.clone()),
                        parameters: Some(tool.parameters.clone()),
                        strict: None,
                    },
                })
            })
            .collect();

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);
        if !openai_tools.is_empty() {
            builder
                .tools(openai_tools)
                .tool_choice(ChatCompletionToolChoiceOption::Mode(ToolChoiceOptions::Auto));
        }
        let request = builder
            .build()
            .map_err(|e| AppError::Model(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::Model(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| AppError::Model("No response from OpenAI".to_string()))?;

        let content = choice.message.content.clone().unwrap_or_default();

        let invocations = match &choice.message.tool_calls {
            Some(calls) => calls
                .iter()
                .filter_map(|call| match call {
                    ChatCompletionMessageToolCalls::Function(call) => Some(ToolCall {
                        id: call.id.clone(),
                        name: call.function.name.clone(),
                        arguments: serde_json::from_str(&call.function.arguments)
                            .unwrap_or(serde_json::json!({})),
                    }),
                    _ => None,
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(Decision {
            content,
            invocations,
        })
    }
}

#[async_trait]
impl SynthesisModel for OpenAiModel {
    async fn synthesize(&self, system: &str, conversation: &[Turn]) -> Result<String> {
        let messages = Self::build_messages(system, conversation)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| AppError::Model(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::Model(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::Model("No response from OpenAI".to_string()))
    }
}

#[async_trait]
impl StructuredModel for OpenAiModel {
    async fn generate_structured(&self, system: &str) -> Result<serde_json::Value> {
        let messages = Self::build_messages(system, &[])?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| AppError::Model(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::Model(format!("OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::Model("No response from OpenAI".to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Schema(format!("response is not valid JSON: {}", e)))
    }
}
