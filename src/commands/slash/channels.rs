//! Channel allow-list commands: /add_ch, /rm_ch, /ls_ch

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::permissions::Permissions;

/// Creates the channel allow-list commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_add_channel_command(),
        create_remove_channel_command(),
        create_list_channels_command(),
    ]
}

fn create_add_channel_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("add_ch")
        .description("Allow commands in a channel (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("channel")
                .description("Channel to allow")
                .kind(CommandOptionType::Channel)
                .required(true)
        })
        .to_owned()
}

fn create_remove_channel_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("rm_ch")
        .description("Remove a channel from the allowed list (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("channel")
                .description("Channel to remove")
                .kind(CommandOptionType::Channel)
                .required(true)
        })
        .to_owned()
}

fn create_list_channels_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("ls_ch")
        .description("List the channels where commands may run")
        .to_owned()
}
