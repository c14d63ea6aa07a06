//! Access administration commands: /grant_access, /disable_access, /ck_access

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::permissions::Permissions;

/// Creates the access administration commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_grant_access_command(),
        create_disable_access_command(),
        create_check_access_command(),
    ]
}

fn create_grant_access_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("grant_access")
        .description("Grant an access type to a user (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("user")
                .description("Target user")
                .kind(CommandOptionType::User)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("type")
                .description("Access type to grant")
                .kind(CommandOptionType::String)
                .required(true)
                .add_string_choice("advanced - exempt from daily limits", "advanced")
                .add_string_choice("blocked - denied all bot usage", "blocked")
        })
        .to_owned()
}

fn create_disable_access_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("disable_access")
        .description("Disable an access type for a user (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("user")
                .description("Target user")
                .kind(CommandOptionType::User)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("type")
                .description("Access type to disable")
                .kind(CommandOptionType::String)
                .required(true)
                .add_string_choice("advanced", "advanced")
                .add_string_choice("blocked", "blocked")
        })
        .to_owned()
}

fn create_check_access_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("ck_access")
        .description("Check a user's access types (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("user")
                .description("Target user")
                .kind(CommandOptionType::User)
                .required(true)
        })
        .to_owned()
}
