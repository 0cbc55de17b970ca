//! WiFi station link.
//!
//! Joins the configured network with bounded retries and reports the
//! station MAC, which names the device on the broker.

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sys::{self as esp_idf_sys, esp};
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

use crate::clock::MicrosClock;
use crate::hal::EspTimerClock;
use crate::log_globals::NET_LOG_STREAM;
use crate::telemetry::backoff::retry;
use crate::telemetry::error::NetError;
use crate::telemetry::identity::MacAddress;
use crate::telemetry::settings::NetConfig;
use crate::telemetry::status::StationStatus;

/// Connected WiFi station.
pub struct WifiLink {
    wifi: BlockingWifi<EspWifi<'static>>,
}

impl WifiLink {
    /// Start the station and join `config.ssid`.
    ///
    /// Blocks until the interface has an address or the reconnect policy
    /// gives up.
    pub fn connect(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        config: &NetConfig,
    ) -> Result<Self, NetError> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        let auth_method = if config.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config.ssid.try_into().map_err(|_| NetError::SsidTooLong)?,
            password: config
                .password
                .try_into()
                .map_err(|_| NetError::PasswordTooLong)?,
            auth_method,
            ..Default::default()
        }))?;

        wifi.start()?;

        let mut link = Self { wifi };
        link.join(config)?;

        Ok(link)
    }

    /// Rejoin the network if the station dropped off.
    pub fn ensure_connected(&mut self, config: &NetConfig) -> Result<(), NetError> {
        if self.wifi.is_connected()? {
            return Ok(());
        }

        crate::log_warn!(NET_LOG_STREAM, EspTimerClock.now_us(), "WiFi: link lost");
        self.join(config)
    }

    fn join(&mut self, config: &NetConfig) -> Result<(), NetError> {
        let wifi = &mut self.wifi;

        retry(
            &config.reconnect,
            |attempt| {
                crate::log_info!(
                    NET_LOG_STREAM,
                    EspTimerClock.now_us(),
                    "WiFi: joining {} (attempt {})",
                    config.ssid,
                    attempt + 1
                );
                wifi.connect()
            },
            |delay_ms| {
                crate::log_warn!(
                    NET_LOG_STREAM,
                    EspTimerClock.now_us(),
                    "WiFi: join failed, retry in {} ms",
                    delay_ms
                );
                FreeRtos::delay_ms(delay_ms);
            },
        )?;

        wifi.wait_netif_up()?;

        let ip = wifi.wifi().sta_netif().get_ip_info()?.ip;
        crate::log_info!(NET_LOG_STREAM, EspTimerClock.now_us(), "WiFi: up, IP {}", ip);

        match self.status() {
            Ok(status) => {
                crate::log_info!(NET_LOG_STREAM, EspTimerClock.now_us(), "WiFi: {}", status);
            }
            Err(e) => {
                crate::log_warn!(NET_LOG_STREAM, EspTimerClock.now_us(), "WiFi: no AP info: {}", e);
            }
        }

        Ok(())
    }

    /// Signal and access point details of the current association.
    pub fn status(&self) -> Result<StationStatus, NetError> {
        // SAFETY: wifi_ap_record_t is a plain C struct; all-zero is valid.
        let mut ap: esp_idf_sys::wifi_ap_record_t = unsafe { core::mem::zeroed() };

        // SAFETY: The driver is started and `ap` outlives the call.
        esp!(unsafe { esp_idf_sys::esp_wifi_sta_get_ap_info(&mut ap) })?;

        Ok(StationStatus {
            rssi_dbm: ap.rssi,
            bssid: MacAddress(ap.bssid),
            channel: ap.primary,
            encrypted: ap.authmode != esp_idf_sys::wifi_auth_mode_t_WIFI_AUTH_OPEN,
        })
    }

    /// Station MAC address.
    pub fn mac(&self) -> Result<MacAddress, NetError> {
        Ok(MacAddress(self.wifi.wifi().sta_netif().get_mac()?))
    }

    pub fn is_connected(&self) -> Result<bool, NetError> {
        Ok(self.wifi.is_connected()?)
    }
}
