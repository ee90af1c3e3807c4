//! FR/EN message table for user-facing notices.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    Fr,
    En,
}

/// Keys for every message the client may surface on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    LoginToPost,
    LoginToLike,
    LoginToComment,
    LoginToCreateEvent,
    LoginToRsvp,
    LoginToSaveArticle,
    LoadPostsFailed,
    CreatePostFailed,
    UpdatePostFailed,
    DeletePostFailed,
    LikeFailed,
    CommentFailed,
    LoadCommentsFailed,
    DeleteCommentFailed,
    LoadEventsFailed,
    RsvpFailed,
    CreateEventFailed,
    UpdateEventFailed,
    DeleteEventFailed,
    LoadNewsFailed,
    SaveArticleFailed,
    SessionExpired,
    ConfirmDeletePost,
    ConfirmDeleteComment,
    ConfirmDeleteEvent,
}

impl Message {
    /// Returns the localized text.
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Fr => self.fr(),
            Locale::En => self.en(),
        }
    }

    fn en(self) -> &'static str {
        match self {
            Self::LoginToPost => "Please log in to post",
            Self::LoginToLike => "Please log in to like posts",
            Self::LoginToCreateEvent => "Please log in to create an event",
            Self::LoginToComment => "Please log in to comment",
            Self::LoginToRsvp => "Please log in to RSVP",
            Self::LoginToSaveArticle => "Please log in to save articles",
            Self::LoadPostsFailed => "Failed to load posts",
            Self::CreatePostFailed => "Failed to create post",
            Self::UpdatePostFailed => "Failed to update post",
            Self::DeletePostFailed => "Failed to delete post",
            Self::LikeFailed => "Failed to update like",
            Self::CommentFailed => "Failed to post comment. Please try again.",
            Self::LoadCommentsFailed => "Failed to load comments",
            Self::DeleteCommentFailed => "Failed to delete comment",
            Self::LoadEventsFailed => "Failed to fetch events",
            Self::RsvpFailed => "Failed to update RSVP",
            Self::CreateEventFailed => "Failed to create event",
            Self::UpdateEventFailed => "Failed to update event",
            Self::DeleteEventFailed => "Failed to delete event",
            Self::LoadNewsFailed => "Failed to fetch news",
            Self::SaveArticleFailed => "Failed to save article",
            Self::SessionExpired => "Your session has expired, please log in again",
            Self::ConfirmDeletePost => "Are you sure you want to delete this post?",
            Self::ConfirmDeleteComment => "Are you sure you want to delete this comment?",
            Self::ConfirmDeleteEvent => "Are you sure you want to delete this event?",
        }
    }

    fn fr(self) -> &'static str {
        match self {
            Self::LoginToPost => "Connectez-vous pour publier",
            Self::LoginToLike => "Connectez-vous pour aimer les publications",
            Self::LoginToCreateEvent => "Connectez-vous pour créer un événement",
            Self::LoginToComment => "Connectez-vous pour commenter",
            Self::LoginToRsvp => "Connectez-vous pour répondre",
            Self::LoginToSaveArticle => "Connectez-vous pour enregistrer des articles",
            Self::LoadPostsFailed => "Impossible de charger les publications",
            Self::CreatePostFailed => "Impossible de créer la publication",
            Self::UpdatePostFailed => "Impossible de modifier la publication",
            Self::DeletePostFailed => "Impossible de supprimer la publication",
            Self::LikeFailed => "Impossible de mettre à jour le j'aime",
            Self::CommentFailed => "Impossible de publier le commentaire. Veuillez réessayer.",
            Self::LoadCommentsFailed => "Impossible de charger les commentaires",
            Self::DeleteCommentFailed => "Impossible de supprimer le commentaire",
            Self::LoadEventsFailed => "Impossible de récupérer les événements",
            Self::RsvpFailed => "Impossible de mettre à jour votre réponse",
            Self::CreateEventFailed => "Impossible de créer l'événement",
            Self::UpdateEventFailed => "Impossible de modifier l'événement",
            Self::DeleteEventFailed => "Impossible de supprimer l'événement",
            Self::LoadNewsFailed => "Impossible de récupérer les actualités",
            Self::SaveArticleFailed => "Impossible d'enregistrer l'article",
            Self::SessionExpired => "Votre session a expiré, veuillez vous reconnecter",
            Self::ConfirmDeletePost => "Voulez-vous vraiment supprimer cette publication ?",
            Self::ConfirmDeleteComment => "Voulez-vous vraiment supprimer ce commentaire ?",
            Self::ConfirmDeleteEvent => "Voulez-vous vraiment supprimer cet événement ?",
        }
    }
}
