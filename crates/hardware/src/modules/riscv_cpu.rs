//! The `riscv-cpu` Module.
//!
//! Registers the `riscv_cpu` class with the host. It provides:
//! 1. **Object glue:** `ConfObject` for `RiscvCpu` and its attributes.
//! 2. **Commands:** An empty `info` and a `status` reporting the `value` attribute.
//! 3. **Test helper:** `create_riscv_cpu`, which realises a CPU through the factory.

use std::any::Any;

use tracing::info;

use crate::common::error::SimError;
use crate::config::Config;
use crate::core::RiscvCpu;
use crate::host::{AttrValue, ConfClass, ConfObject, Host, InfoSection, pre_conf_object};

/// Class name of the CPU model.
pub const CLASS_NAME: &str = "riscv_cpu";

/// Name of the module providing [`CLASS_NAME`].
pub const MODULE_NAME: &str = "riscv-cpu";

const ATTRIBUTES: &[&str] = &[
    "value",
    "freq_hz",
    "pc",
    "enabled",
    "cycle_count",
    "step_count",
];

impl ConfObject for RiscvCpu {
    fn name(&self) -> &str {
        &self.name
    }

    fn class_name(&self) -> &str {
        CLASS_NAME
    }

    fn get_attribute(&self, attr: &str) -> Result<AttrValue, SimError> {
        Ok(match attr {
            "value" => AttrValue::UInt(self.value),
            "freq_hz" => AttrValue::UInt(self.get_frequency()),
            "pc" => AttrValue::UInt(self.get_program_counter()),
            "enabled" => AttrValue::Bool(self.enabled),
            "cycle_count" => AttrValue::UInt(self.get_cycle_count()),
            "step_count" => AttrValue::UInt(self.get_step_count()),
            _ => return Err(unknown_attribute(attr)),
        })
    }

    fn set_attribute(&mut self, attr: &str, value: AttrValue) -> Result<(), SimError> {
        match attr {
            "value" => self.value = value.expect_u64(attr)?,
            "freq_hz" => {
                let hz = value.expect_u64(attr)?;
                if hz == 0 {
                    return Err(SimError::Attribute(
                        "attribute 'freq_hz' must be at least 1".to_owned(),
                    ));
                }
                self.set_frequency(hz, 1);
            }
            "pc" => {
                let pc = value.expect_u64(attr)?;
                let pc = u32::try_from(pc).map_err(|_| {
                    SimError::Attribute(format!("attribute 'pc' out of range: {pc:#x}"))
                })?;
                self.pc = pc;
            }
            "enabled" => {
                let _ = if value.expect_bool(attr)? {
                    self.enable_processor()
                } else {
                    self.disable_processor()
                };
            }
            "cycle_count" | "step_count" => {
                return Err(SimError::Attribute(format!(
                    "attribute '{attr}' is read-only"
                )));
            }
            _ => return Err(unknown_attribute(attr)),
        }
        Ok(())
    }

    fn attribute_names(&self) -> &'static [&'static str] {
        ATTRIBUTES
    }

    fn finalize(&mut self) {
        info!(cpu = %self.name, pc = self.pc, "finalized");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn unknown_attribute(attr: &str) -> SimError {
    SimError::Attribute(format!("class '{CLASS_NAME}' has no attribute '{attr}'"))
}

/// `info` for `riscv_cpu`: there is no static information to report.
pub fn get_info(_obj: &dyn ConfObject) -> Result<Vec<InfoSection>, SimError> {
    Ok(Vec::new())
}

/// `status` for `riscv_cpu`: the `value` attribute under `Registers`.
pub fn get_status(obj: &dyn ConfObject) -> Result<Vec<InfoSection>, SimError> {
    let value = obj.get_attribute("value")?;
    Ok(vec![(
        "Registers".to_owned(),
        vec![("Value".to_owned(), value)],
    )])
}

/// Registers the `riscv-cpu` module with default CPU settings.
pub fn register(host: &mut Host) -> Result<(), SimError> {
    register_with_config(host, Config::default())
}

/// Registers the `riscv-cpu` module; objects the factory creates use `config`.
pub fn register_with_config(host: &mut Host, config: Config) -> Result<(), SimError> {
    let class = ConfClass::new(
        CLASS_NAME,
        "single-core in-order RV32I processor",
        move |name| Box::new(RiscvCpu::from_config(name, &config)) as Box<dyn ConfObject>,
    );
    host.register_class(class)?;
    host.new_info_command(CLASS_NAME, get_info);
    host.new_status_command(CLASS_NAME, get_status);
    host.register_module(MODULE_NAME, &[CLASS_NAME]);
    Ok(())
}

/// Creates a `riscv_cpu` object through the configuration.
///
/// # Returns
///
/// The name of the new object; `riscv_cpu<n>` when `name` is `None`.
pub fn create_riscv_cpu(host: &mut Host, name: Option<&str>) -> Result<String, SimError> {
    let mut names = host.add_configuration(vec![pre_conf_object(name, CLASS_NAME)])?;
    names
        .pop()
        .ok_or_else(|| SimError::General("configuration created no object".to_owned()))
}
