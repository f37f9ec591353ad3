pub use super::subscriber::Entity as Subscriber;
pub use super::subscriber_channel::Entity as SubscriberChannel;
pub use super::subscriber_guild::Entity as SubscriberGuild;
