//! Well-known entity numbers: superusers, system admins and special files.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::types::{AccountId, FileId};

/// Smallest accepted size of the reserved system range.
const MIN_RESERVED_SYSTEM_ENTITIES: u64 = 100;

/// Numbers of the special system files.
///
/// # Validation Rules
///
/// - Every number must be non-zero and within the reserved system range
///   (checked by [`EntityNumbers::validate`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpecialFiles {
    /// Network address book.
    #[serde(default = "default_address_book")]
    pub address_book: u64,
    /// Node details.
    #[serde(default = "default_node_details")]
    pub node_details: u64,
    /// Fee schedules.
    #[serde(default = "default_fee_schedules")]
    pub fee_schedules: u64,
    /// Exchange rates.
    #[serde(default = "default_exchange_rates")]
    pub exchange_rates: u64,
    /// Application properties.
    #[serde(default = "default_application_properties")]
    pub application_properties: u64,
    /// API permissions.
    #[serde(default = "default_api_permissions")]
    pub api_permissions: u64,
    /// Throttle definitions.
    #[serde(default = "default_throttle_definitions")]
    pub throttle_definitions: u64,
}

impl SpecialFiles {
    fn all(&self) -> [(&'static str, u64); 7] {
        [
            ("address_book", self.address_book),
            ("node_details", self.node_details),
            ("fee_schedules", self.fee_schedules),
            ("exchange_rates", self.exchange_rates),
            ("application_properties", self.application_properties),
            ("api_permissions", self.api_permissions),
            ("throttle_definitions", self.throttle_definitions),
        ]
    }

    /// Files the address-book admin may update: the address book, node
    /// details, application properties, API permissions and throttles.
    pub fn address_book_admin_files(&self) -> [u64; 5] {
        [
            self.address_book,
            self.node_details,
            self.application_properties,
            self.api_permissions,
            self.throttle_definitions,
        ]
    }
}

impl Default for SpecialFiles {
    fn default() -> Self {
        Self {
            address_book: default_address_book(),
            node_details: default_node_details(),
            fee_schedules: default_fee_schedules(),
            exchange_rates: default_exchange_rates(),
            application_properties: default_application_properties(),
            api_permissions: default_api_permissions(),
            throttle_definitions: default_throttle_definitions(),
        }
    }
}

/// Well-known accounts and files of the network.
///
/// Entities with `num <= num_reserved_system_entities` in this shard and realm
/// are system entities, subject to the privileged-update rules.
///
/// # Validation Rules
///
/// - `num_reserved_system_entities` must be >= 100
/// - Every admin account and special file must be non-zero and
///   `<= num_reserved_system_entities`
/// - `treasury` and `system_admin` must differ
///
/// # Example
///
/// ```no_run
/// # use ledger_sigs_types::config::EntityNumbers;
/// let numbers = EntityNumbers::builder()
///     .treasury(2)
///     .system_admin(50)
///     .num_reserved_system_entities(750)
///     .build()
///     .expect("valid entity numbers");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityNumbers {
    /// Shard of every well-known entity.
    #[serde(default)]
    pub shard: u64,
    /// Realm of every well-known entity.
    #[serde(default)]
    pub realm: u64,
    /// Highest entity number in the reserved system range.
    #[serde(default = "default_num_reserved_system_entities")]
    pub num_reserved_system_entities: u64,
    /// Treasury account.
    #[serde(default = "default_treasury")]
    pub treasury: u64,
    /// System administrator account.
    #[serde(default = "default_system_admin")]
    pub system_admin: u64,
    /// Account administering the address book and network properties.
    #[serde(default = "default_address_book_admin")]
    pub address_book_admin: u64,
    /// Account administering fee schedules.
    #[serde(default = "default_fee_schedules_admin")]
    pub fee_schedules_admin: u64,
    /// Account administering exchange rates.
    #[serde(default = "default_exchange_rates_admin")]
    pub exchange_rates_admin: u64,
    /// Special system files.
    #[serde(default)]
    pub files: SpecialFiles,
}

#[bon::bon]
impl EntityNumbers {
    /// Creates a validated set of entity numbers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any rule in the type-level
    /// documentation is violated.
    #[builder]
    pub fn new(
        #[builder(default)] shard: u64,
        #[builder(default)] realm: u64,
        #[builder(default = default_num_reserved_system_entities())]
        num_reserved_system_entities: u64,
        #[builder(default = default_treasury())] treasury: u64,
        #[builder(default = default_system_admin())] system_admin: u64,
        #[builder(default = default_address_book_admin())] address_book_admin: u64,
        #[builder(default = default_fee_schedules_admin())] fee_schedules_admin: u64,
        #[builder(default = default_exchange_rates_admin())] exchange_rates_admin: u64,
        #[builder(default)] files: SpecialFiles,
    ) -> Result<Self, ConfigError> {
        let numbers = Self {
            shard,
            realm,
            num_reserved_system_entities,
            treasury,
            system_admin,
            address_book_admin,
            fee_schedules_admin,
            exchange_rates_admin,
            files,
        };
        numbers.validate()?;
        Ok(numbers)
    }
}

impl EntityNumbers {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_reserved_system_entities < MIN_RESERVED_SYSTEM_ENTITIES {
            return Err(ConfigError::Validation {
                message: format!(
                    "num_reserved_system_entities must be >= {}, got {}",
                    MIN_RESERVED_SYSTEM_ENTITIES, self.num_reserved_system_entities
                ),
            });
        }
        let accounts = [
            ("treasury", self.treasury),
            ("system_admin", self.system_admin),
            ("address_book_admin", self.address_book_admin),
            ("fee_schedules_admin", self.fee_schedules_admin),
            ("exchange_rates_admin", self.exchange_rates_admin),
        ];
        for (name, num) in accounts.into_iter().chain(self.files.all()) {
            if num == 0 || num > self.num_reserved_system_entities {
                return Err(ConfigError::Validation {
                    message: format!(
                        "{name} must be in 1..={}, got {num}",
                        self.num_reserved_system_entities
                    ),
                });
            }
        }
        if self.treasury == self.system_admin {
            return Err(ConfigError::Validation {
                message: format!("treasury and system_admin must differ, both are {}", self.treasury),
            });
        }
        Ok(())
    }

    /// Returns the account with `num` in the configured shard and realm.
    #[inline]
    pub fn account(&self, num: u64) -> AccountId {
        AccountId::new(self.shard, self.realm, num)
    }

    /// Returns the file with `num` in the configured shard and realm.
    #[inline]
    pub fn file(&self, num: u64) -> FileId {
        FileId::new(self.shard, self.realm, num)
    }

    /// The treasury account id.
    pub fn treasury_account(&self) -> AccountId {
        self.account(self.treasury)
    }

    /// Whether `id` is the treasury.
    pub fn is_treasury(&self, id: AccountId) -> bool {
        id == self.treasury_account()
    }

    /// Whether `id` is the treasury or the system administrator.
    pub fn is_superuser(&self, id: AccountId) -> bool {
        self.is_home(id.shard, id.realm) && (id.num == self.treasury || id.num == self.system_admin)
    }

    /// Whether `id` lies in the reserved system account range.
    pub fn is_system_account(&self, id: AccountId) -> bool {
        self.is_home(id.shard, id.realm) && id.num <= self.num_reserved_system_entities
    }

    /// Whether `id` lies in the reserved system file range.
    pub fn is_system_file(&self, id: FileId) -> bool {
        self.is_home(id.shard, id.realm) && id.num <= self.num_reserved_system_entities
    }

    fn is_home(&self, shard: u64, realm: u64) -> bool {
        shard == self.shard && realm == self.realm
    }
}

impl Default for EntityNumbers {
    fn default() -> Self {
        Self {
            shard: 0,
            realm: 0,
            num_reserved_system_entities: default_num_reserved_system_entities(),
            treasury: default_treasury(),
            system_admin: default_system_admin(),
            address_book_admin: default_address_book_admin(),
            fee_schedules_admin: default_fee_schedules_admin(),
            exchange_rates_admin: default_exchange_rates_admin(),
            files: SpecialFiles::default(),
        }
    }
}

fn default_num_reserved_system_entities() -> u64 {
    750
}

fn default_treasury() -> u64 {
    2
}

fn default_system_admin() -> u64 {
    50
}

fn default_address_book_admin() -> u64 {
    55
}

fn default_fee_schedules_admin() -> u64 {
    56
}

fn default_exchange_rates_admin() -> u64 {
    57
}

fn default_address_book() -> u64 {
    101
}

fn default_node_details() -> u64 {
    102
}

fn default_fee_schedules() -> u64 {
    111
}

fn default_exchange_rates() -> u64 {
    112
}

fn default_application_properties() -> u64 {
    121
}

fn default_api_permissions() -> u64 {
    122
}

fn default_throttle_definitions() -> u64 {
    123
}
