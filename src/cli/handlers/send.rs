//! Send notification handler
//!
//! Builds an Android or iOS notification from the command line, then either
//! prints the signed request (`--dry-run`) or sends it as a customizedcast.

use crate::cli::{CliContext, Platform, SendArgs};
use super::resolve_credentials;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use umeng_push::clients::{create_async_client_from_umeng_config, AsyncUmengClient};
use umeng_push::notification::{
    AndroidNotification, AndroidPolicy, IosAps, IosNotification, IosPolicy, Notification,
    PushNotification,
};

/// Handler for send operations
pub struct SendHandler<'a> {
    context: &'a CliContext,
}

impl<'a> SendHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub async fn handle_send(&self, platform: Platform) -> Result<()> {
        let client = create_async_client_from_umeng_config(&self.context.config_manager.config().umeng)?;

        match platform {
            Platform::Android {
                common,
                display_type,
                ticker,
                title,
                text,
                after_open,
                url,
                activity,
                custom,
                extra,
                out_biz_no,
            } => {
                let (mut notification, dry_run) = self.android_base(common)?;
                let payload = &mut notification.payload;
                payload.display_type = display_type;
                payload.body.ticker = ticker;
                payload.body.title = title;
                payload.body.text = text;
                payload.body.after_open = after_open;
                payload.body.url = url;
                payload.body.activity = activity;
                payload.body.custom = custom.map(|raw| parse_custom(&raw));
                if !extra.is_empty() {
                    payload.extra = Some(extra.into_iter().collect::<HashMap<_, _>>());
                }
                if let Some(out_biz_no) = out_biz_no {
                    notification.policy.get_or_insert_with(AndroidPolicy::default).out_biz_no = out_biz_no;
                }

                self.dispatch(&client, &mut notification, dry_run).await
            }
            Platform::Ios {
                common,
                alert,
                badge,
                sound,
                category,
                content_available,
                fields,
                collapse_id,
            } => {
                let (mut notification, dry_run) = self.ios_base(common)?;
                let aps = IosAps {
                    alert,
                    badge: badge.unwrap_or_default(),
                    sound: sound.unwrap_or_default(),
                    content_available: if content_available { "1".to_string() } else { String::new() },
                    category: category.unwrap_or_default(),
                };
                notification.set_aps(&aps)?;
                for (key, value) in fields {
                    notification.payload.insert(key, Value::String(value));
                }
                if let Some(collapse_id) = collapse_id {
                    notification.policy.get_or_insert_with(IosPolicy::default).apns_collapse_id = collapse_id;
                }

                self.dispatch(&client, &mut notification, dry_run).await
            }
        }
    }

    fn android_base(&self, common: SendArgs) -> Result<(AndroidNotification, bool)> {
        let mut notification = AndroidNotification::default();
        let (dry_run, expire_time, max_send_num) = self.fill_base(&mut notification.base, common)?;
        if expire_time.is_some() || max_send_num.is_some() {
            notification.policy = Some(AndroidPolicy {
                expire_time: expire_time.unwrap_or_default(),
                max_send_num,
                ..Default::default()
            });
        }
        Ok((notification, dry_run))
    }

    fn ios_base(&self, common: SendArgs) -> Result<(IosNotification, bool)> {
        let mut notification = IosNotification::default();
        let (dry_run, expire_time, max_send_num) = self.fill_base(&mut notification.base, common)?;
        if expire_time.is_some() || max_send_num.is_some() {
            notification.policy = Some(IosPolicy {
                expire_time: expire_time.unwrap_or_default(),
                max_send_num,
                ..Default::default()
            });
        }
        Ok((notification, dry_run))
    }

    /// Copy credentials and targeting into the base, returning the flags the
    /// platform-specific policy needs
    fn fill_base(
        &self,
        base: &mut Notification,
        common: SendArgs,
    ) -> Result<(bool, Option<String>, Option<u32>)> {
        let (app_key, app_master_secret) = resolve_credentials(self.context, common.credentials)?;
        base.set_app_config(app_key, app_master_secret);
        base.alias_type = common.alias_type;
        base.alias = common.alias;
        base.file_id = common.file_id;
        base.description = common.description;

        let production_mode = common
            .production_mode
            .or(self.context.config_manager.config().umeng.production_mode);
        if let Some(production_mode) = production_mode {
            base.production_mode = production_mode.to_string();
        }

        Ok((common.dry_run, common.expire_time, common.max_send_num))
    }

    async fn dispatch<N: PushNotification>(
        &self,
        client: &AsyncUmengClient,
        notification: &mut N,
        dry_run: bool,
    ) -> Result<()> {
        if dry_run {
            notification.base_mut().prepare_customizedcast();
            let request = client.prepare(notification)?;
            println!("Dry run - would send {} notification", N::PLATFORM);
            println!("URL: {}", request.url);
            println!("Body: {}", request.body);
            return Ok(());
        }

        client
            .send_customizedcast(notification)
            .await
            .with_context(|| format!("Failed to send {} notification", N::PLATFORM))?;
        println!("{} notification sent successfully", N::PLATFORM);
        Ok(())
    }
}

/// JSON when it parses, otherwise the raw string
fn parse_custom(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_custom() {
        assert_eq!(parse_custom(r#"{"k":"v"}"#), json!({"k": "v"}));
        assert_eq!(parse_custom("open://inbox"), json!("open://inbox"));
    }
}
