// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Terminal front-end for the dmail client.
//!
//! Renders the presentation-layer view state over stdin/stdout. Every
//! remote failure becomes a short notice; the loop never exits on error.

use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use dmail_client::attachments::PinataClient;
use dmail_client::blockchain::{MailContract, SEPOLIA};
use dmail_client::client::DmailClient;
use dmail_client::config::Config;
use dmail_client::directory::SupabaseDirectory;
use dmail_client::error::DmailError;
use dmail_client::models::{MailMessage, WalletAddress};
use dmail_client::ui::{ComposeForm, InboxView, Notice, NoticeLevel, RegisterDialog};
use dmail_client::wallet::{LocalKeyProvider, SessionEvent};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let provider = match LocalKeyProvider::from_key_hex(config.private_key.as_deref()) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!(error = %e, "no usable signing provider");
            eprintln!("{}", Notice::error(&DmailError::from(e)).text);
            std::process::exit(1);
        }
    };

    let directory = match SupabaseDirectory::new(&config.supabase_url, &config.supabase_anon_key) {
        Ok(directory) => directory,
        Err(e) => {
            eprintln!("directory client error: {e}");
            std::process::exit(1);
        }
    };

    let uploader = match PinataClient::new(
        &config.pinata_api_url,
        config.pinata_api_key.clone(),
        config.pinata_secret_key.clone(),
        &config.ipfs_gateway_url,
    ) {
        Ok(uploader) => uploader,
        Err(e) => {
            eprintln!("uploader error: {e}");
            std::process::exit(1);
        }
    };

    let signer = provider.signer();
    let rpc_url = config.rpc_url.clone();
    let contract_address = config.contract_address.clone();
    let make_gateway = move |_account: &WalletAddress| {
        MailContract::connect(
            &rpc_url,
            &contract_address,
            SEPOLIA.explorer_url,
            signer.clone(),
        )
    };

    let mut client = DmailClient::new(provider, directory, make_gateway, uploader);
    let mut compose = ComposeForm::new();
    let mut inbox = InboxView::new();
    let mut register = RegisterDialog::new();

    println!("dmail - decentralized email ({})", SEPOLIA.name);

    // Silent connection probe on load.
    match client.try_restore().await {
        Ok(Some(event)) => show_session_event(&event, &mut register),
        Ok(None) => show(Notice::info("No session. Type `connect` to begin.")),
        Err(e) => {
            tracing::warn!(error = %e, "session restore failed");
            show(Notice::error(&e));
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();
    loop {
        let Ok(Some(line)) = lines.next_line().await else {
            break;
        };
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => print_help(),
            "quit" | "exit" => break,
            "connect" => match client.connect().await {
                Ok(event) => show_session_event(&event, &mut register),
                Err(e) => {
                    tracing::warn!(error = %e, "connect failed");
                    show(Notice::error(&e));
                }
            },
            "whoami" => match client.session().account() {
                Some(account) => println!(
                    "{} ({})",
                    client.session().email().unwrap_or("unregistered"),
                    account.short()
                ),
                None => println!("Not connected."),
            },
            "register" => {
                register.local_part = rest.to_string();
                let Some(local) = register.normalized_local() else {
                    println!("Usage: register <local-part> (e.g. `register alice`)");
                    continue;
                };
                if !register.begin_submit() {
                    continue;
                }
                match client.register(&local).await {
                    Ok(email) => {
                        register.finish_submit(true);
                        show(Notice::success(format!("Registered {email}")));
                    }
                    Err(e) => {
                        register.finish_submit(false);
                        tracing::warn!(error = %e, "registration failed");
                        show(Notice::error(&e));
                    }
                }
            }
            "inbox" => match client.fetch_inbox().await {
                Ok(messages) => {
                    inbox.set_entries(messages);
                    render_inbox(&inbox);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "inbox fetch failed");
                    show(Notice::error(&e));
                }
            },
            "sort" => {
                inbox.toggle_sort();
                render_inbox(&inbox);
            }
            "page" => {
                if let Ok(page) = rest.parse::<usize>() {
                    inbox.set_page(page.saturating_sub(1));
                }
                render_inbox(&inbox);
            }
            "rows" => {
                if let Ok(rows) = rest.parse::<usize>() {
                    inbox.set_rows_per_page(rows);
                }
                render_inbox(&inbox);
            }
            "open" => {
                match rest.parse::<usize>() {
                    Ok(row) if row >= 1 => inbox.select_visible_row(row - 1),
                    _ => println!("Usage: open <row>"),
                }
                if let Some(message) = inbox.selected() {
                    let url = message
                        .attachment
                        .as_ref()
                        .map(|cid| client.attachment_url(cid));
                    render_detail(message, url.as_deref());
                }
            }
            "close" => inbox.close_detail(),
            "to" => compose.to = rest.to_string(),
            "subject" => compose.subject = rest.to_string(),
            "body" => compose.body = rest.to_string(),
            "attach" => {
                let path = (!rest.is_empty()).then(|| Path::new(rest));
                match client.upload_attachment(path).await {
                    Ok(cid) => {
                        show(Notice::success(format!("Uploaded attachment {cid}")));
                        compose.attachment = Some(cid);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "attachment upload failed");
                        show(Notice::error(&e));
                    }
                }
            }
            "send" => {
                if let Err(issue) = compose.validate() {
                    println!("{issue}");
                    continue;
                }
                if !compose.begin_submit() {
                    continue;
                }
                let result = client
                    .send(
                        &compose.to,
                        &compose.subject,
                        &compose.body,
                        compose.attachment.as_ref(),
                    )
                    .await;
                match result {
                    Ok(ack) => {
                        compose.finish_submit(true);
                        show(Notice::success(format!("Email sent: {}", ack.explorer_url)));
                    }
                    Err(e) => {
                        compose.finish_submit(false);
                        tracing::warn!(error = %e, "send failed");
                        show(Notice::error(&e));
                    }
                }
            }
            other => println!("Unknown command `{other}`. Type `help`."),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn show(notice: Notice) {
    let prefix = match notice.level {
        NoticeLevel::Info => "•",
        NoticeLevel::Success => "✓",
        NoticeLevel::Error => "✗",
    };
    println!("{prefix} {}", notice.text);
}

fn show_session_event(event: &SessionEvent, register: &mut RegisterDialog) {
    match event {
        SessionEvent::Connected { account, email } => match email {
            Some(email) => println!("Connected as {email} ({})", account.short()),
            None => println!("Connected as {} (name unresolved)", account.short()),
        },
        SessionEvent::RegistrationRequired { account } => {
            register.open();
            println!(
                "Connected as {}. No @dmail.org address yet - use `register <name>`.",
                account.short()
            );
        }
        SessionEvent::Disconnected => println!("Disconnected."),
    }
}

fn render_inbox(inbox: &InboxView) {
    let rows = inbox.visible_rows();
    if rows.is_empty() {
        println!("Inbox is empty.");
        return;
    }
    println!("{:<4} {:<44} {:<30} {}", "#", "Sender", "Subject", "Date");
    for (i, message) in rows.iter().enumerate() {
        let date = message
            .datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<4} {:<44} {:<30} {}",
            i + 1,
            message.sender_display,
            message.subject,
            date
        );
    }
    println!(
        "Page {}/{} ({} per page)",
        inbox.page() + 1,
        inbox.page_count(),
        inbox.rows_per_page()
    );
}

fn render_detail(message: &MailMessage, attachment_url: Option<&str>) {
    println!("Subject: {}", message.subject);
    println!("From:    {}", message.sender_display);
    if let Some(dt) = message.datetime() {
        println!("Date:    {}", dt.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!();
    println!("{}", message.body);
    if let Some(url) = attachment_url {
        println!();
        println!("Attachment: {url}");
    }
}

fn print_help() {
    println!(
        "Commands:
  connect                 connect the wallet
  register <name>         register <name>@dmail.org for the active wallet
  whoami                  show the active account
  inbox                   fetch and list received mail
  sort | page <n> | rows <n>   adjust the inbox table
  open <row> | close      open/close a message detail view
  to/subject/body <text>  fill the compose form
  attach <path>           upload an attachment, keep its content id
  send                    send the composed message
  quit"
    );
}
