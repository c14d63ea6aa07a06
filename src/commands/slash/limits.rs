//! Usage limit commands: /limit, /ck_limit

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::permissions::Permissions;

/// Creates the usage limit commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_limit_command(), create_check_limit_command()]
}

fn create_limit_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("limit")
        .description("Set the default daily usage limit for regular users (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("limit")
                .description("Maximum AI calls per day")
                .kind(CommandOptionType::Integer)
                .required(true)
        })
        .to_owned()
}

fn create_check_limit_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("ck_limit")
        .description("Show your AI usage and daily limit")
        .to_owned()
}
