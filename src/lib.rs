// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! Lets native code inside a JVM process adopt the environment the Java side
//! has configured: the `org.sigrok.androidutils.Environment.getEnvironment()`
//! table is copied into the process environment with `setenv` semantics.
//!
//! # Crate Architecture
//!
//! ```text
//!        JNI_OnLoad / srau_init_environment / JNI_OnUnload   (ffi)
//!                           |
//!                           v
//!              ,---------------------------,
//!              |   bridge: BridgeSlot      |
//!              |   load / import / unload  |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!             runtime    descriptor  importer
//!          ContextGuard  DescriptorCache  pairs --> set_var
//!          Local/Global
//!               |
//!               v
//!          runtime::jni (jni-sys)
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, config    |
//!   +-----------------------------------------+
//! ```

pub mod bridge;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ffi;
pub mod importer;
pub mod logging;
pub mod runtime;
