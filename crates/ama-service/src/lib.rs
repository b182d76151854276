//! # ama-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Every mutation runs through a service that commits through a repository
//! and then hands the resulting event to the context's publisher.

pub mod dto;
pub mod services;

pub use dto::{
    AnswerMessageRequest, AnsweredMessageResponse, CreateMessageRequest, CreateRoomRequest,
    CreatedMessageResponse, HealthResponse, MessageResponse, ReactedMessagesResponse,
    ReactionCountResponse, ReadinessResponse, RoomResponse,
};
pub use services::{
    MessageService, ReactionService, RoomService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
