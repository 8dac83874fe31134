use clap::Parser;
use design_viewer::api::error::ApiError;
use design_viewer::cli::commands::{
    build_backend, build_session, cmd_classify, cmd_delete, cmd_demo, cmd_generate, cmd_list,
    cmd_login, cmd_logout, cmd_show, cmd_whoami,
};
use design_viewer::cli::config::{
    Cli, Commands, Settings, load_config, log_filter, resolve_settings,
};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(cli.verbose)))
        .init();

    let config = load_config(cli.config.as_deref());
    let settings = resolve_settings(&cli, &config);

    match run(&cli.command, &settings) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn run(command: &Commands, settings: &Settings) -> Result<String, ApiError> {
    match command {
        Commands::Classify {
            name,
            equipment_type,
            hint,
        } => Ok(cmd_classify(name, equipment_type, hint.as_deref())),
        Commands::Demo => Ok(cmd_demo()),
        Commands::List => cmd_list(&mut build_session(settings)),
        Commands::Show { id } => cmd_show(&mut build_session(settings), id),
        Commands::Generate { prompt } => cmd_generate(&mut build_session(settings), prompt),
        Commands::Delete { id } => cmd_delete(&mut build_session(settings), id),
        Commands::Login {
            username,
            password,
            print_token,
        } => cmd_login(&build_backend(settings), username, password, *print_token),
        Commands::Whoami => {
            let session = build_session(settings);
            cmd_whoami(session.api(), session.auth())
        }
        Commands::Logout => {
            let session = build_session(settings);
            cmd_logout(session.api(), session.auth())
        }
    }
}
